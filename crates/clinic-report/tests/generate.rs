//! End-to-end report generation (request -> saved XLSX -> unzip -> inspect cells)

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use chrono::NaiveDate;
use clinic_report::source::AppointmentPayload;
use clinic_report::{
    DirectorySaver, InMemorySaver, ProductivityPayload, ReportConfig, ReportError,
    ReportGenerator, ReportRequest, StaticProductivitySource,
};
use clinic_report_core::{AttendanceRecord, AttendanceStats, Employee, Shift};
use pretty_assertions::assert_eq;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

fn request(employee: Employee) -> ReportRequest {
    ReportRequest {
        employee,
        attendance: (1..=10).map(|d| AttendanceRecord::new(date(d), 8.0)).collect(),
        shifts: Vec::new(),
        period_start: date(1),
        period_end: date(31),
        stats: Some(AttendanceStats {
            total_hours: 80.0,
            days_worked: Some(10),
        }),
    }
}

fn appointment(day: u32, status: &str, amount: f64) -> AppointmentPayload {
    AppointmentPayload {
        timestamp: format!("2026-10-{day:02}T09:00:00"),
        patient: "Juan Soto".to_string(),
        specialty: "Cardiología".to_string(),
        status: status.to_string(),
        amount,
    }
}

fn ana_payload() -> ProductivityPayload {
    ProductivityPayload {
        scheduled: 10,
        completed: 8,
        revenue: 400000.0,
        specialties: BTreeMap::from([
            ("Cardiología".to_string(), 5),
            ("Pediatría".to_string(), 3),
        ]),
        appointments: vec![
            appointment(2, "completada", 50000.0),
            appointment(3, "confirmada", 45000.0),
            appointment(6, "Completada", 55000.0),
            appointment(7, "cancelada", 0.0),
        ],
    }
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

/// Raw `<v>` or inline `<t>` content of a cell in a worksheet part
fn cell_content(sheet_xml: &str, a1: &str) -> Option<String> {
    let start = sheet_xml
        .find(&format!("<c r=\"{a1}\" "))
        .or_else(|| sheet_xml.find(&format!("<c r=\"{a1}\">")))?;
    let rest = &sheet_xml[start..];
    let cell = &rest[..rest.find("</c>")?];
    for (open, close) in [("<v>", "</v>"), ("<t>", "</t>")] {
        if let Some(i) = cell.find(open) {
            let body = &cell[i + open.len()..];
            return body.find(close).map(|j| body[..j].to_string());
        }
    }
    None
}

#[tokio::test]
async fn test_ana_perez_report() {
    let generator = ReportGenerator::new(
        StaticProductivitySource::new(ana_payload()),
        InMemorySaver::new(),
        ReportConfig::default(),
    );

    let filename = generator
        .generate(&request(Employee::new(7, "Ana", "Pérez")))
        .await
        .unwrap();
    assert_eq!(filename, "Reporte_Productividad_Ana_Perez_10-2026_BETA.xlsx");

    let bytes = generator.saver().get(&filename).unwrap();
    let workbook = read_part(&bytes, "xl/workbook.xml");
    let names: Vec<usize> = ["Dashboard", "Detalle de Citas", "Estadísticas"]
        .iter()
        .map(|n| workbook.find(&format!("name=\"{n}\"")).unwrap())
        .collect();
    assert!(names[0] < names[1] && names[1] < names[2]);
    assert_eq!(workbook.matches("<sheet ").count(), 3);

    let dashboard = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert_eq!(cell_content(&dashboard, "D5").as_deref(), Some("PACIENTES ATENDIDOS"));
    assert_eq!(cell_content(&dashboard, "D6").as_deref(), Some("8"));
    assert_eq!(cell_content(&dashboard, "G5").as_deref(), Some("INGRESOS GENERADOS"));
    assert_eq!(cell_content(&dashboard, "G6").as_deref(), Some("400000"));
    assert_eq!(cell_content(&dashboard, "B10").as_deref(), Some("0.8"));
    assert_eq!(cell_content(&dashboard, "C10").as_deref(), Some("BUENO"));
    assert!(dashboard.contains("<tabColor rgb=\"FF1F4E78\"/>"));
    assert!(dashboard.contains("<mergeCell ref=\"D6:E6\"/>"));
}

#[tokio::test]
async fn test_detail_totals_match_rows() {
    let generator = ReportGenerator::new(
        StaticProductivitySource::new(ana_payload()),
        InMemorySaver::new(),
        ReportConfig::default(),
    );
    let filename = generator
        .generate(&request(Employee::new(7, "Ana", "Pérez")))
        .await
        .unwrap();
    let bytes = generator.saver().get(&filename).unwrap();
    let detail = read_part(&bytes, "xl/worksheets/sheet2.xml");

    // banner, header, four appointments, totals
    assert_eq!(cell_content(&detail, "A7").as_deref(), Some("TOTALES"));
    assert_eq!(cell_content(&detail, "E7").as_deref(), Some("2"));
    assert_eq!(cell_content(&detail, "F7").as_deref(), Some("150000"));
    assert_eq!(cell_content(&detail, "E6").as_deref(), Some("cancelada"));

    assert!(detail.contains("<mergeCell ref=\"A7:D7\"/>"));
    for a1 in ["B7", "C7", "D7"] {
        assert!(detail.contains(&format!("<c r=\"{a1}\" s=\"")), "{a1} not styled");
    }

    assert!(detail.contains("<autoFilter ref=\"A2:F6\"/>"));
    assert!(detail.contains("topLeftCell=\"A3\""));

    let styles = read_part(&bytes, "xl/styles.xml");
    for fill in ["FFC6EFCE", "FFFFEB9C", "FFFFC7CE", "FFF2F2F2"] {
        assert!(styles.contains(fill), "missing fill {fill}");
    }
    assert!(styles.contains("formatCode=\"0.0%\""));
}

#[tokio::test]
async fn test_unavailable_source_still_generates() {
    let generator = ReportGenerator::new(
        StaticProductivitySource::unavailable(),
        InMemorySaver::new(),
        ReportConfig::default(),
    );
    let filename = generator
        .generate(&request(Employee::new(7, "Ana", "Pérez")))
        .await
        .unwrap();
    assert_eq!(filename, "Reporte_Productividad_Ana_Perez_10-2026_BETA.xlsx");

    let bytes = generator.saver().get(&filename).unwrap();
    let dashboard = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert_eq!(cell_content(&dashboard, "A6").as_deref(), Some("80"));
    assert_eq!(cell_content(&dashboard, "D6").as_deref(), Some("0"));
    assert_eq!(cell_content(&dashboard, "G6").as_deref(), Some("0"));
    assert_eq!(cell_content(&dashboard, "C10").as_deref(), Some("BAJO"));

    let detail = read_part(&bytes, "xl/worksheets/sheet2.xml");
    assert_eq!(cell_content(&detail, "A3").as_deref(), Some("TOTALES"));
}

#[tokio::test]
async fn test_unsafe_names_save_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig {
        output_dir: dir.path().to_path_buf(),
        ..ReportConfig::default()
    };
    let generator = ReportGenerator::new(
        StaticProductivitySource::new(ana_payload()),
        DirectorySaver::new(dir.path()),
        config,
    );

    let filename = generator
        .generate(&request(Employee::new(9, "José María", "Núñez/../../Peña")))
        .await
        .unwrap();

    assert_eq!(
        filename,
        "Reporte_Productividad_Jose_Maria_NunezPena_10-2026_BETA.xlsx"
    );
    assert!(!filename.contains('/'));
    let bytes = std::fs::read(dir.path().join(&filename)).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_save_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("ocupado");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let generator = ReportGenerator::new(
        StaticProductivitySource::new(ana_payload()),
        DirectorySaver::new(blocker.join("reportes")),
        ReportConfig::default(),
    );
    let err = generator
        .generate(&request(Employee::new(7, "Ana", "Pérez")))
        .await
        .unwrap_err();

    match err {
        ReportError::Save { filename, .. } => {
            assert_eq!(filename, "Reporte_Productividad_Ana_Perez_10-2026_BETA.xlsx")
        }
        other => panic!("expected save error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_render_failure_saves_nothing() {
    // one bar segment per cell pushes the bar rows past the last XLSX column
    let config = ReportConfig {
        max_bar_width: 20000,
        ..ReportConfig::default()
    };
    let generator = ReportGenerator::new(
        StaticProductivitySource::new(ana_payload()),
        InMemorySaver::new(),
        config,
    );

    let err = generator
        .generate(&request(Employee::new(7, "Ana", "Pérez")))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Render(_)), "got {err:?}");
    assert!(generator.saver().filenames().is_empty());
}

#[tokio::test]
async fn test_shift_only_request() {
    let generator = ReportGenerator::new(
        StaticProductivitySource::new(ana_payload()),
        InMemorySaver::new(),
        ReportConfig::default(),
    );
    let shifts = (1..=4)
        .map(|d| {
            Shift::new(
                date(d).and_hms_opt(8, 0, 0).unwrap(),
                date(d).and_hms_opt(14, 0, 0).unwrap(),
            )
        })
        .collect();
    let request = ReportRequest {
        attendance: Vec::new(),
        shifts,
        stats: None,
        ..request(Employee::new(7, "Ana", "Pérez"))
    };

    let filename = generator.generate(&request).await.unwrap();
    let bytes = generator.saver().get(&filename).unwrap();
    let dashboard = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert_eq!(cell_content(&dashboard, "A6").as_deref(), Some("24"));
}

#[tokio::test]
async fn test_concurrent_reports_are_independent() {
    let generator = ReportGenerator::new(
        StaticProductivitySource::new(ana_payload()),
        InMemorySaver::new(),
        ReportConfig::default(),
    );
    let first = request(Employee::new(1, "Ana", "Pérez"));
    let second = request(Employee::new(2, "Luis", "Rojas"));

    let (a, b) = tokio::join!(generator.generate(&first), generator.generate(&second));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a, b);
    assert_eq!(generator.saver().filenames().len(), 2);
}
