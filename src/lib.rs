pub mod config;
pub mod controller;
pub mod err;
pub mod models;
pub mod service;

pub use crate::config::AppConfig;
pub use crate::controller::CertificateListController;
pub use crate::err::{Error, Result};
pub use crate::models::{Certificate, CertificateForm, CertificateStatus, RecordId};
pub use crate::service::{CertificateService, HttpCertificateService};
