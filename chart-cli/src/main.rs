use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chart_core::{
    ordered_encounters, EncounterOrder, PatientDirectory, PatientRecord, SortDirection, SortKey,
};
use chart_fhir::{extract_record_str, load_directory, LoaderConfig};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "chart-cli",
    about = "Chuẩn hóa bundle FHIR JSON thành hồ sơ bệnh nhân."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// In hồ sơ của một bundle dưới dạng JSON.
    Summary {
        /// Đường dẫn tới file JSON bundle.
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Tìm bệnh nhân theo mã hoặc tên.
    Search {
        #[command(flatten)]
        source: SourceArgs,
        query: String,
    },
    /// Hiển thị chi tiết một bệnh nhân.
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Mã bệnh nhân.
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "date")]
        sort_by: SortKey,
        #[arg(long, default_value = "desc")]
        sort_order: SortDirection,
        /// Ngày tính tuổi (YYYY-MM-DD), mặc định là hôm nay.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Thư mục chứa các bundle.
    #[arg(long, env = "CHART_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// File JSON ghi đè cấu hình nạp dữ liệu.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    fn loader_config(&self) -> anyhow::Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => LoaderConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }

    fn load(&self) -> anyhow::Result<PatientDirectory> {
        let config = self.loader_config()?;
        let report = load_directory(&config)
            .with_context(|| format!("Không nạp được thư mục {:?}", config.data_dir))?;
        info!(
            loaded = report.records.len(),
            skipped = report.skipped.len(),
            dropped = report.dropped,
            "loaded patient records"
        );
        Ok(report.into_directory())
    }
}

fn read_config(path: &Path) -> anyhow::Result<LoaderConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
    serde_json::from_str(&data).with_context(|| format!("Cấu hình không hợp lệ trong {path:?}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Summary { input } => summary(&input),
        Command::Search { source, query } => search(&source, &query),
        Command::Show {
            source,
            id,
            sort_by,
            sort_order,
            today,
        } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            show(&source, &id, EncounterOrder::new(sort_by, sort_order), today)
        }
    }
}

fn summary(input: &Path) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(input)
        .with_context(|| format!("Không đọc được file {input:?}"))?;
    let record = extract_record_str(&data)
        .with_context(|| format!("Không trích xuất được hồ sơ từ {input:?}"))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn search(source: &SourceArgs, query: &str) -> anyhow::Result<()> {
    let directory = source.load()?;
    let matches = directory.search(query);
    for record in &matches {
        println!("{}  {}", record.subject_id, display(&record.full_name));
    }
    println!("{} patient(s) matched", matches.len());
    Ok(())
}

fn show(
    source: &SourceArgs,
    id: &str,
    order: EncounterOrder,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let directory = source.load()?;
    let Some(record) = directory.find_by_id(id) else {
        bail!("Không tìm thấy bệnh nhân {id}");
    };
    print_record(record, order, today);
    Ok(())
}

fn display(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn print_record(record: &PatientRecord, order: EncounterOrder, today: NaiveDate) {
    let age = record
        .age_on(today)
        .map_or_else(|| "N/A".to_string(), |age| age.to_string());

    println!("Patient:     {} ({})", display(&record.full_name), record.subject_id);
    println!("Born:        {} (age {age})", display(&record.date_of_birth));
    println!("Sex:         {}", display(&record.sex));
    println!("Insurance:   {}", display(&record.insurance_payor));
    println!("PCP:         {}", display(&record.pcp_name));
    println!("Phone:       {}", display(&record.contact_phone));
    println!("Address:     {}", display(&record.address_display));
    println!("Marital:     {}", display(&record.marital_status));
    println!("Language:    {}", display(&record.preferred_language));

    println!("\nEncounters ({}, {}):", record.encounters.len(), order.direction);
    for encounter in ordered_encounters(&record.encounters, order) {
        println!(
            "  {}  {}  {}  {}  {}",
            display(&encounter.date),
            display(&encounter.visit_type),
            display(&encounter.facility),
            display(&encounter.provider),
            display(&encounter.primary_diagnosis_text)
        );
    }

    println!("\nDiagnoses ({}):", record.diagnoses.len());
    for diagnosis in &record.diagnoses {
        println!(
            "  {}  {}  [{}]",
            display(&diagnosis.code),
            display(&diagnosis.description),
            display(&diagnosis.status)
        );
    }

    println!("\nMedications ({}):", record.medications.len());
    for medication in &record.medications {
        println!(
            "  {}  {}  {}",
            medication.name,
            display(&medication.dosage),
            display(&medication.status)
        );
    }
}
