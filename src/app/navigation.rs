use super::*;

impl FreeTextResponseApp {
    /// Desmonta el widget actual y monta el de la unidad `index`. El nuevo
    /// widget parte de lo que haya en la caché de página.
    pub fn go_to_unit(&mut self, index: usize) {
        if index >= self.page.units.len() || index == self.current {
            return;
        }

        let Some(fresh) = mount(&self.page, index, &self.cache, &self.transport, &self.notifier)
        else {
            return;
        };
        let old = std::mem::replace(&mut self.widget, fresh);
        if old.has_pending_requests() {
            self.retired.push(old);
        }
        self.current = index;
    }

    pub fn next_unit(&mut self) {
        self.go_to_unit(self.current + 1);
    }

    pub fn previous_unit(&mut self) {
        if let Some(prev) = self.current.checked_sub(1) {
            self.go_to_unit(prev);
        }
    }

    pub fn unit_titles(&self) -> Vec<&str> {
        self.page
            .units
            .iter()
            .map(|u| u.display_name.as_str())
            .collect()
    }
}
