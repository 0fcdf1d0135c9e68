use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use certificate_module::config::DataConfig;
use certificate_module::{
    AppConfig, Certificate, CertificateForm, CertificateListController, CertificateService,
    CertificateStatus, Error, HttpCertificateService, RecordId,
};

#[derive(Parser)]
#[command(name = "certificate-module", version, about = "Manage certificate records")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every certificate
    List,
    /// Register a new certificate
    Register(RecordArgs),
    /// Edit a listed certificate and submit it
    Update {
        id: RecordId,
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Delete a certificate by id
    Delete { id: RecordId },
    /// Print the configuration summary
    Config,
}

#[derive(Args)]
struct RecordArgs {
    #[arg(long)]
    student_id: Option<RecordId>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    organization: Option<String>,
    #[arg(long)]
    issue_date: Option<NaiveDate>,
    #[arg(long)]
    expiration_date: Option<NaiveDate>,
    #[arg(long)]
    renewal_date: Option<NaiveDate>,
    #[arg(long)]
    status: Option<CertificateStatus>,
    #[arg(long)]
    description: Option<String>,
}

impl RecordArgs {
    fn into_form(self, default_status: CertificateStatus) -> CertificateForm {
        CertificateForm {
            student_id: self.student_id,
            certificate_name: self.name.unwrap_or_default(),
            issuing_organization: self.organization.unwrap_or_default(),
            issue_date: self.issue_date,
            expiration_date: self.expiration_date,
            renewal_date: self.renewal_date,
            status: self.status.unwrap_or(default_status),
            description: self.description.unwrap_or_default(),
        }
    }

    fn apply_to(self, staged: &mut Certificate) {
        if self.student_id.is_some() {
            staged.student_id = self.student_id;
        }
        if self.name.is_some() {
            staged.certificate_name = self.name;
        }
        if self.organization.is_some() {
            staged.issuing_organization = self.organization;
        }
        if self.issue_date.is_some() {
            staged.issue_date = self.issue_date;
        }
        if self.expiration_date.is_some() {
            staged.expiration_date = self.expiration_date;
        }
        if self.renewal_date.is_some() {
            staged.renewal_date = self.renewal_date;
        }
        if self.status.is_some() {
            staged.status = self.status;
        }
        if self.description.is_some() {
            staged.description = self.description;
        }
    }
}

/// Builds the register form and applies the description limits the form
/// markup would enforce.
fn register_form(args: RecordArgs, data: &DataConfig) -> Result<CertificateForm, Error> {
    let form = args.into_form(data.default_status.clone());
    form.check_description(data.min_description_length, data.max_description_length)?;
    Ok(form)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let config = Arc::new(config);

    if let Command::Config = cli.command {
        for (key, value) in config.summary() {
            println!("{:<18} {}", key, value);
        }
        return Ok(());
    }

    let service = HttpCertificateService::new(config.api.clone())?;
    let mut controller = CertificateListController::new(service, config.clone());
    controller.on_init().await;

    match cli.command {
        Command::List | Command::Config => {}
        Command::Register(args) => {
            let mut form = register_form(args, &config.data)?;
            let ok = controller.register(&mut form).await;
            controller.log_action(if ok { "Registered certificate" } else { "Register failed" });
        }
        Command::Update { id, record } => {
            let listed = controller
                .certificates()
                .iter()
                .find(|c| c.id.as_ref() == Some(&id))
                .cloned();
            let listed = match listed {
                Some(listed) => listed,
                None => bail!("certificate {} is not in the current list", id),
            };
            controller.begin_edit(&listed);
            record.apply_to(controller.staging_mut());
            let ok = controller.update().await;
            controller.log_action(if ok { "Updated certificate" } else { "Update failed" });
        }
        Command::Delete { id } => {
            let target = controller
                .certificates()
                .iter()
                .find(|c| c.id.as_ref() == Some(&id))
                .cloned()
                .unwrap_or(Certificate {
                    id: Some(id),
                    ..Default::default()
                });
            let ok = controller.delete(&target).await;
            controller.log_action(if ok { "Deleted certificate" } else { "Delete failed" });
        }
    }

    print_certificates(&controller);
    Ok(())
}

fn print_certificates<S: CertificateService>(controller: &CertificateListController<S>) {
    let text = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    println!(
        "{:>5}  {:<10}  {:<28}  {:<22}  {:<10}  {:<10}  {:<8}",
        "id", "student", "name", "organization", "issued", "expires", "status"
    );
    for cert in controller.certificates() {
        println!(
            "{:>5}  {:<10}  {:<28}  {:<22}  {:<10}  {:<10}  {:<8}",
            text(cert.id.as_ref().map(RecordId::to_string)),
            text(cert.student_id.as_ref().map(RecordId::to_string)),
            text(cert.certificate_name.clone()),
            text(cert.issuing_organization.clone()),
            text(cert.issue_date.map(|d| d.to_string())),
            text(cert.expiration_date.map(|d| d.to_string())),
            text(cert.status.as_ref().map(CertificateStatus::to_string)),
        );
    }
    println!("{} certificate(s)", controller.certificate_count());
}
