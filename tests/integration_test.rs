//! Integration tests for the lead dashboard
//! Drives the library end to end from a CSV fixture on disk

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use social_seller::backup::RemoteStorage;
use social_seller::config::{parse_config, DashboardConfig};
use social_seller::error::{AdapterResult, DashboardError};
use social_seller::filter::filter_leads;
use social_seller::metrics::summarize;
use social_seller::notify::{notify_all, Notifier, StubNotifier};
use social_seller::render::{render_html, render_text, Theme};
use social_seller::sentiment::{classify, classify_all, LexiconClassifier};
use social_seller::source::{load, CsvFileSource};
use social_seller::{storage, FilterCriteria, SendStatus, SentimentLabel, Session};

const FIXTURE: &str = "Nome,Telefone,Plataforma,Status,Interação,Valor,Data
Ana Souza,5511999990001,Instagram,Novo,Adorei o produto! Muito bom,\"R$ 1.500,00\",01/03/2024
Bruno Lima,5511999990002,WhatsApp,Perdido,Atendimento péssimo e caro,\"R$ 500,00\",15/03/2024
Carla Dias,5511999990003,Instagram,Novo,,\"R$ 2.000,00\",31/03/2024
Diego Rocha,5511999990004,Facebook,Ganho,Great service thanks,750,not a date
";

fn write_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("tracking/leads.csv");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, FIXTURE).unwrap();
    path
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

struct RejectingNotifier {
    reject: &'static str,
}

impl Notifier for RejectingNotifier {
    fn send(&self, phone: &str, _message: &str) -> AdapterResult<String> {
        if phone == self.reject {
            Err(DashboardError::Send("number not on WhatsApp".to_string()))
        } else {
            Ok(format!("msg-{}", phone))
        }
    }

    fn name(&self) -> &'static str {
        "rejecting"
    }
}

struct MemoryStorage {
    uploads: RefCell<Vec<Vec<u8>>>,
}

impl RemoteStorage for MemoryStorage {
    fn upload(&self, path: &Path) -> AdapterResult<()> {
        let bytes = fs::read(path).map_err(|e| DashboardError::Connectivity(e.to_string()))?;
        self.uploads.borrow_mut().push(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[test]
fn test_load_fixture_with_portuguese_headers() {
    let dir = TempDir::new().unwrap();
    let table = load(&CsvFileSource::new(write_fixture(&dir)));

    assert_eq!(table.len(), 4);
    assert!(table.loaded_at.is_some());
    assert_eq!(table.leads[0].name, "Ana Souza");
    assert_eq!(table.leads[0].value, Some(1500.0));
    assert_eq!(table.leads[0].date, date(2024, 3, 1));
    assert_eq!(table.leads[1].value, Some(500.0));
    assert_eq!(table.leads[3].date, None);
}

#[test]
fn test_missing_source_yields_empty_table() {
    let dir = TempDir::new().unwrap();
    let table = load(&CsvFileSource::new(dir.path().join("missing.csv")));
    assert!(table.is_empty());
    assert!(table.loaded_at.is_none());
}

#[test]
fn test_status_filter_keeps_matching_rows() {
    let dir = TempDir::new().unwrap();
    let table = load(&CsvFileSource::new(write_fixture(&dir)));

    let criteria = FilterCriteria {
        statuses: vec!["Novo".to_string()],
        ..Default::default()
    };
    let subset = filter_leads(&table.leads, &criteria);
    assert_eq!(subset.len(), 2);
    assert!(subset.iter().all(|l| l.platform == "Instagram"));
}

#[test]
fn test_date_bounds_are_inclusive() {
    let dir = TempDir::new().unwrap();
    let table = load(&CsvFileSource::new(write_fixture(&dir)));

    let criteria = FilterCriteria {
        date_from: date(2024, 3, 1),
        date_to: date(2024, 3, 31),
        ..Default::default()
    };
    let names: Vec<String> = filter_leads(&table.leads, &criteria)
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, vec!["Ana Souza", "Bruno Lima", "Carla Dias"]);
}

#[test]
fn test_sentiment_over_fixture() {
    let dir = TempDir::new().unwrap();
    let table = load(&CsvFileSource::new(write_fixture(&dir)));
    let classifier = LexiconClassifier::new();

    let sentiments = classify_all(&classifier, &table.leads);
    assert_eq!(sentiments[0].label, SentimentLabel::Positive);
    assert_eq!(sentiments[1].label, SentimentLabel::Negative);
    assert_eq!(sentiments[2].label, SentimentLabel::Neutral);
    assert_eq!(sentiments[2].confidence, 0.0);
    assert_eq!(sentiments[3].label, SentimentLabel::Positive);

    let empty = classify(&classifier, "");
    assert_eq!(empty.label, SentimentLabel::Neutral);
    assert_eq!(empty.confidence, 0.0);
}

#[test]
fn test_empty_subset_has_zero_percentages() {
    let dir = TempDir::new().unwrap();
    let table = load(&CsvFileSource::new(write_fixture(&dir)));

    let criteria = FilterCriteria {
        platforms: vec!["TikTok".to_string()],
        ..Default::default()
    };
    let subset = filter_leads(&table.leads, &criteria);
    let summary = summarize(&subset, &classify_all(&LexiconClassifier::new(), &subset));
    assert_eq!(summary.total, 0);
    assert_eq!(summary.positive_pct, 0.0);
    assert_eq!(summary.average_value, 0.0);
}

#[test]
fn test_notify_with_one_failure() {
    let dir = TempDir::new().unwrap();
    let table = load(&CsvFileSource::new(write_fixture(&dir)));

    let report = notify_all(
        &table.leads,
        "Olá {name}! Obrigado pelo contato via {platform}.",
        &RejectingNotifier {
            reject: "5511999990002",
        },
    );

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.sent_count(), 3);
    assert!(matches!(report.outcomes[1].status, SendStatus::Failed { .. }));
    assert_eq!(report.outcomes[3].name, "Diego Rocha");
    assert!(report.outcomes[3].status.is_sent());
}

fn session_for(dir: &TempDir) -> Session {
    let config: DashboardConfig = parse_config("report:\n  title: Relatório de Leads\n").unwrap();
    Session::with_adapters(
        config,
        Box::new(CsvFileSource::new(write_fixture(dir))),
        Box::new(LexiconClassifier::new()),
        Box::new(StubNotifier::new()),
        Box::new(MemoryStorage {
            uploads: RefCell::new(vec![]),
        }),
    )
}

#[test]
fn test_refresh_keeps_prior_table_when_source_disappears() {
    let dir = TempDir::new().unwrap();
    let mut session = session_for(&dir);
    assert_eq!(session.refresh(), None);
    assert_eq!(session.table().len(), 4);

    fs::remove_file(dir.path().join("tracking/leads.csv")).unwrap();
    assert!(session.refresh().is_some());
    assert_eq!(session.table().len(), 4);
}

#[test]
fn test_report_is_deterministic_pdf() {
    let dir = TempDir::new().unwrap();
    let mut session = session_for(&dir);
    session.refresh();

    let criteria = FilterCriteria {
        statuses: vec!["Novo".to_string()],
        ..Default::default()
    };
    let first = session.report(&criteria);
    let second = session.report(&criteria);
    assert!(first.starts_with(b"%PDF-"));
    assert_eq!(first, second);

    let text = String::from_utf8_lossy(&first);
    assert!(text.contains("(Total Leads: 2) Tj"));
    assert!(text.contains("(Period: 2024-03-01 to 2024-03-31) Tj"));
}

#[test]
fn test_views_render_filtered_rows() {
    let dir = TempDir::new().unwrap();
    let mut session = session_for(&dir);
    session.refresh();

    let criteria = FilterCriteria {
        platforms: vec!["WhatsApp".to_string()],
        ..Default::default()
    };
    let view = session.view(&criteria);
    assert_eq!(view.summary.total, 1);

    let text = render_text(&view);
    assert!(text.contains("Bruno Lima"));
    assert!(!text.contains("| Ana Souza"));

    let html = render_html(&view, Theme::Dark, Some(session.report(&criteria).as_slice()));
    assert!(html.contains("data:application/pdf;base64,"));
    assert!(html.contains("Bruno Lima"));
}

#[test]
fn test_export_then_backup() {
    let dir = TempDir::new().unwrap();
    let mut session = session_for(&dir);
    session.refresh();

    let export = dir.path().join("exports/novo.csv");
    let leads = session.filtered(&FilterCriteria {
        statuses: vec!["Novo".to_string()],
        ..Default::default()
    });
    storage::export_csv(&leads, &export).unwrap();

    assert!(session.backup(&export));
    assert!(!session.backup(&dir.path().join("exports/missing.csv")));
}
