//! Static application configuration.
//!
//! Nearly every value here is display metadata. The only fields read at
//! runtime are `api.*` (service URLs), `data.default_status`, the description
//! limits, `theme.dark_mode_enabled` (initial theme) and `debug.debug_mode`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::err::Result;
use crate::models::CertificateStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppMetadata,
    pub theme: ThemeConfig,
    pub datetime: DateTimeConfig,
    pub data: DataConfig,
    pub session: SessionConfig,
    pub api: ApiConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    pub title: String,
    pub app_title: String,
    pub app_version: String,
    pub developer_name: String,
    pub organization_name: String,
    pub app_description: String,
    pub copyright_year: u16,
    pub license_type: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            title: "certificate-module".to_string(),
            app_title: "Certificate Database".to_string(),
            app_version: "2.5.0".to_string(),
            developer_name: "Aravind V".to_string(),
            organization_name: "TechCert Systems Pvt Ltd".to_string(),
            app_description: "Web app to manage and verify digital certificates efficiently."
                .to_string(),
            copyright_year: 2025,
            license_type: "MIT License".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub theme_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub button_hover_color: String,
    pub border_radius: String,
    pub font_family: String,
    pub font_size: String,
    pub animation_speed: String,
    pub dark_mode_enabled: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            theme_color: "#007bff".to_string(),
            secondary_color: "#6c757d".to_string(),
            accent_color: "#ffc107".to_string(),
            background_color: "#f8f9fa".to_string(),
            text_color: "#212529".to_string(),
            button_hover_color: "#0056b3".to_string(),
            border_radius: "10px".to_string(),
            font_family: "Poppins, sans-serif".to_string(),
            font_size: "16px".to_string(),
            animation_speed: "0.3s".to_string(),
            dark_mode_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTimeConfig {
    pub date_format: String,
    pub timezone: String,
    pub refresh_interval_ms: u64,
    pub max_date_range_days: u32,
}

impl Default for DateTimeConfig {
    fn default() -> Self {
        Self {
            date_format: "YYYY-MM-DD".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            refresh_interval_ms: 60_000,
            max_date_range_days: 365,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub max_certificates: usize,
    pub default_status: CertificateStatus,
    // declared but never consulted
    pub auto_save_enabled: bool,
    pub show_notifications: bool,
    // declared but never consulted
    pub allow_duplicate_names: bool,
    pub min_description_length: usize,
    pub max_description_length: usize,
    pub field_validation_delay_ms: u64,
    pub storage_key: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            max_certificates: 100,
            default_status: CertificateStatus::Active,
            auto_save_enabled: true,
            show_notifications: true,
            allow_duplicate_names: false,
            min_description_length: 10,
            max_description_length: 500,
            field_validation_delay_ms: 200,
            storage_key: "certificateData".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub current_user: String,
    pub admin_email: String,
    pub is_logged_in: bool,
    pub user_role: String,
    pub last_login: String,
    pub session_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            current_user: "Admin".to_string(),
            admin_email: "admin@certdb.com".to_string(),
            is_logged_in: true,
            user_role: "superadmin".to_string(),
            last_login: "2025-10-15T23:10:00".to_string(),
            session_timeout_ms: 30 * 60 * 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub register_endpoint: String,
    pub update_endpoint: String,
    pub delete_endpoint: String,
    pub fetch_all_endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub network_status: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.techcerts.com/v1".to_string(),
            register_endpoint: "/register".to_string(),
            update_endpoint: "/update".to_string(),
            delete_endpoint: "/delete".to_string(),
            fetch_all_endpoint: "/certificates".to_string(),
            api_key: None,
            network_status: "online".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub debug_mode: bool,
    pub analytics_enabled: bool,
    pub tracking_id: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            debug_mode: true,
            analytics_enabled: true,
            tracking_id: "GA-TECHCERTS-001".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Key/value pairs logged at start-up in debug mode.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("appTitle", self.app.app_title.clone()),
            ("appVersion", self.app.app_version.clone()),
            ("developerName", self.app.developer_name.clone()),
            ("organizationName", self.app.organization_name.clone()),
            ("appDescription", self.app.app_description.clone()),
            ("themeColor", self.theme.theme_color.clone()),
            ("backgroundColor", self.theme.background_color.clone()),
            ("fontFamily", self.theme.font_family.clone()),
            ("darkModeEnabled", self.theme.dark_mode_enabled.to_string()),
            ("dateFormat", self.datetime.date_format.clone()),
            ("timezone", self.datetime.timezone.clone()),
            ("maxCertificates", self.data.max_certificates.to_string()),
            ("currentUser", self.session.current_user.clone()),
            ("userRole", self.session.user_role.clone()),
            ("adminEmail", self.session.admin_email.clone()),
            ("apiBaseUrl", self.api.base_url.clone()),
            ("debugMode", self.debug.debug_mode.to_string()),
            ("networkStatus", self.api.network_status.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [api]
            base_url = "http://localhost:8080"

            [data]
            default_status = "Expired"
            max_description_length = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.fetch_all_endpoint, "/certificates");
        assert_eq!(config.data.default_status, CertificateStatus::Expired);
        assert_eq!(config.data.max_description_length, 64);
        assert_eq!(config.data.min_description_length, 10);
        assert_eq!(config.app.app_title, "Certificate Database");
        assert!(config.debug.debug_mode);
    }

    #[test]
    fn empty_file_is_the_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(AppConfig::from_toml_str("[api\nbase_url = 1").is_err());
    }

    #[test]
    fn summary_leaves_out_the_api_key() {
        let mut config = AppConfig::default();
        config.api.api_key = Some("XYZ-123-SECRET".to_string());
        let summary = config.summary();
        assert!(summary.iter().any(|(k, v)| *k == "apiBaseUrl" && v == &config.api.base_url));
        assert!(summary.iter().all(|(_, v)| !v.contains("SECRET")));
    }
}
