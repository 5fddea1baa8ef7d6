use thiserror::Error;

/// Fallo de una petición submit/save. Es el único error que ve el usuario.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("error de red en {url}: {message}")]
    Network { url: String, message: String },

    #[error("el backend devolvió HTTP {status} en {url}")]
    Status { url: String, status: u16 },

    #[error("respuesta no válida del backend: {0}")]
    Body(String),
}

/// Campo esperado ausente o con un valor que no sabemos aplicar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("campo `{field}` ausente o no válido en la respuesta")]
pub struct MalformedField {
    pub field: &'static str,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no se pudo generar el CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("error de E/S al guardar la descarga: {0}")]
    Io(#[from] std::io::Error),

    #[error("el navegador rechazó la descarga: {0}")]
    Platform(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuración YAML no válida: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("la página no tiene ninguna unidad configurada")]
    NoUnits,
}
