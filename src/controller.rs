use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::config::AppConfig;
use crate::err::Error;
use crate::models::{Certificate, CertificateForm};
use crate::service::CertificateService;

/// View state for the certificate screen plus the CRUD operations that drive it.
///
/// Every operation delegates to the service and swallows failures after
/// logging them. The list is only ever replaced wholesale by a successful
/// fetch, so a failed call leaves it exactly as it was.
pub struct CertificateListController<S> {
    service: S,
    config: Arc<AppConfig>,
    certificates: Vec<Certificate>,
    staging: Certificate,
    dark_mode: bool,
    last_updated: Option<DateTime<Local>>,
    data_fetch_time: Option<DateTime<Local>>,
    error_count: usize,
    log_messages: Vec<String>,
}

impl<S: CertificateService> CertificateListController<S> {
    pub fn new(service: S, config: Arc<AppConfig>) -> Self {
        let dark_mode = config.theme.dark_mode_enabled;
        Self {
            service,
            config,
            certificates: Vec::new(),
            staging: Certificate::default(),
            dark_mode,
            last_updated: None,
            data_fetch_time: None,
            error_count: 0,
            log_messages: Vec::new(),
        }
    }

    pub async fn on_init(&mut self) {
        self.last_updated = Some(Local::now());
        if self.config.debug.debug_mode {
            log::info!("Certificate app configuration loaded");
            for (key, value) in self.config.summary() {
                log::info!("  {:<18} {}", key, value);
            }
        }
        self.fetch_all().await;
    }

    /// Replaces the list with the service's current set. Returns whether the
    /// fetch succeeded; on failure the previous list stays visible.
    pub async fn fetch_all(&mut self) -> bool {
        let result = self.service.get_certificates().await;
        match result {
            Ok(certificates) => {
                log::debug!("fetched {} certificates", certificates.len());
                self.certificates = certificates;
                self.data_fetch_time = Some(Local::now());
                true
            }
            Err(err) => {
                self.record_failure("fetch certificates", err);
                false
            }
        }
    }

    /// Submits the form as a new record. The form is cleared only on success.
    pub async fn register(&mut self, form: &mut CertificateForm) -> bool {
        let result = self.service.register_certificate(form).await;
        match result {
            Ok(reply) => {
                log::debug!("register reply: {}", reply);
                form.clear(self.config.data.default_status.clone());
                self.fetch_all().await;
                true
            }
            Err(err) => {
                self.record_failure("register certificate", err);
                false
            }
        }
    }

    pub fn begin_edit(&mut self, certificate: &Certificate) {
        self.staging = certificate.staged_copy();
    }

    /// Submits the staged record in full.
    pub async fn update(&mut self) -> bool {
        let result = self.service.update_certificate(&self.staging).await;
        match result {
            Ok(reply) => {
                log::debug!("update reply: {}", reply);
                self.fetch_all().await;
                true
            }
            Err(err) => {
                self.record_failure("update certificate", err);
                false
            }
        }
    }

    pub async fn delete(&mut self, certificate: &Certificate) -> bool {
        let id = match &certificate.id {
            Some(id) => id,
            None => {
                self.record_failure(
                    "delete certificate",
                    Error::invalid_payload("record has no identifier"),
                );
                return false;
            }
        };
        let result = self.service.delete_certificate(id).await;
        match result {
            Ok(reply) => {
                log::debug!("delete reply: {}", reply);
                self.fetch_all().await;
                true
            }
            Err(err) => {
                self.record_failure("delete certificate", err);
                false
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        log::info!("Dark mode: {}", if self.dark_mode { "ON" } else { "OFF" });
    }

    pub fn log_action<A: AsRef<str>>(&mut self, action: A) {
        let action = action.as_ref();
        let time = Local::now().format("%H:%M:%S");
        self.log_messages.push(format!("[{}] {}", time, action));
        if self.config.debug.debug_mode {
            log::info!("{}", action);
        }
    }

    fn record_failure(&mut self, operation: &str, err: Error) {
        self.error_count += 1;
        log::error!("{} failed: {}", operation, err);
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn certificate_count(&self) -> usize {
        self.certificates.len()
    }

    pub fn staging(&self) -> &Certificate {
        &self.staging
    }

    pub fn staging_mut(&mut self) -> &mut Certificate {
        &mut self.staging
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn data_fetch_time(&self) -> Option<DateTime<Local>> {
        self.data_fetch_time
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn log_messages(&self) -> &[String] {
        &self.log_messages
    }
}
