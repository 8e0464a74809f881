use std::collections::VecDeque;

/// A blocking error dialog. Unlike a status toast it never times out; the
/// user has to acknowledge it before any other key does anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Holds pending alerts in arrival order. Only the front one is shown;
/// dismissing it reveals the next, so two failures landing in the same
/// response drain are both seen.
#[derive(Debug, Default)]
pub struct AlertManager {
    alerts: VecDeque<Alert>,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, message: impl Into<String>) {
        self.alerts.push_back(Alert::new(message));
    }

    pub fn current(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn dismiss(&mut self) -> bool {
        self.alerts.pop_front().is_some()
    }

    pub fn is_active(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub fn count(&self) -> usize {
        self.alerts.len()
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_and_dismiss() {
        let mut manager = AlertManager::new();
        assert!(!manager.is_active());

        manager.raise("Upload failed: timeout");
        assert!(manager.is_active());
        assert_eq!(manager.current().unwrap().message, "Upload failed: timeout");

        assert!(manager.dismiss());
        assert!(!manager.is_active());
        assert!(manager.current().is_none());
    }

    #[test]
    fn dismiss_on_empty_is_a_no_op() {
        let mut manager = AlertManager::new();
        assert!(!manager.dismiss());
    }

    #[test]
    fn alerts_queue_in_arrival_order() {
        let mut manager = AlertManager::new();
        manager.raise("first");
        manager.raise("second");

        assert_eq!(manager.count(), 2);
        assert_eq!(manager.current().unwrap().message, "first");

        manager.dismiss();
        assert_eq!(manager.current().unwrap().message, "second");

        manager.dismiss();
        assert!(!manager.is_active());
    }
}
