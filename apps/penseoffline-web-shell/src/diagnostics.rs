use serde::Serialize;

pub(crate) const PHASE_BOOTING: &str = "booting";
pub(crate) const PHASE_READY: &str = "ready";
pub(crate) const PHASE_ERROR: &str = "error";

/// Shell state readable from page scripts via `penseOfflineDiagnostics()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ShellDiagnostics {
    pub phase: String,
    pub api_base_url: Option<String>,
    pub api_base_source: Option<String>,
    pub last_error: Option<String>,
    pub error_count: u64,
    pub last_badge_error: Option<String>,
}

impl Default for ShellDiagnostics {
    fn default() -> Self {
        Self {
            phase: PHASE_BOOTING.to_string(),
            api_base_url: None,
            api_base_source: None,
            last_error: None,
            error_count: 0,
            last_badge_error: None,
        }
    }
}

impl ShellDiagnostics {
    pub(crate) fn record_api_base(&mut self, base_url: &str, source: &str) {
        self.api_base_url = Some(base_url.to_string());
        self.api_base_source = Some(source.to_string());
    }

    pub(crate) fn mark_ready(&mut self) {
        if self.phase == PHASE_BOOTING {
            self.phase = PHASE_READY.to_string();
        }
    }

    /// A failed boot leaves the shell inert; later errors cannot clear it.
    pub(crate) fn record_boot_error(&mut self, message: &str) {
        self.phase = PHASE_ERROR.to_string();
        self.record_error("boot", message);
    }

    pub(crate) fn record_error(&mut self, context: &str, message: &str) {
        self.last_error = Some(format!("{context}: {message}"));
        self.error_count += 1;
    }

    /// Badge failures are cosmetic and do not count as shell errors.
    pub(crate) fn record_badge_error(&mut self, message: &str) {
        self.last_badge_error = Some(message.to_string());
    }

    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!("{{\"phase\":\"{PHASE_ERROR}\",\"last_error\":\"diagnostics serialization failed\"}}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_error_is_sticky_and_visible_in_json() {
        let mut diagnostics = ShellDiagnostics::default();
        diagnostics.record_api_base("/api", "override");
        diagnostics.record_boot_error("PenseOffline API base URL `ftp://x` is not an http(s) origin");
        diagnostics.mark_ready();

        assert_eq!(diagnostics.phase, PHASE_ERROR);
        assert_eq!(diagnostics.error_count, 1);

        let json: serde_json::Value =
            serde_json::from_str(&diagnostics.to_json()).expect("diagnostics json");
        assert_eq!(json["phase"], "error");
        assert_eq!(json["api_base_url"], "/api");
        assert_eq!(
            json["last_error"],
            "boot: PenseOffline API base URL `ftp://x` is not an http(s) origin"
        );
    }

    #[test]
    fn runtime_errors_accumulate_after_ready() {
        let mut diagnostics = ShellDiagnostics::default();
        diagnostics.mark_ready();
        diagnostics.record_error("render", "invalid selector");
        diagnostics.record_error("logout", "storage error: quota");
        diagnostics.record_badge_error("Erro ao contar notificações");

        assert_eq!(diagnostics.phase, PHASE_READY);
        assert_eq!(diagnostics.error_count, 2);
        assert_eq!(
            diagnostics.last_error.as_deref(),
            Some("logout: storage error: quota")
        );
        assert_eq!(
            diagnostics.last_badge_error.as_deref(),
            Some("Erro ao contar notificações")
        );
    }
}
