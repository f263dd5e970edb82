//! End-to-end tests for the batch reader over delimited text and workbooks.

use std::io::{Cursor, Write};

use chrono::{NaiveDate, NaiveDateTime};
use rowcast_ingest::{
    IngestError, ReadOutcome, Sheet, SheetCell, Source, Workbook, read_all, read_delimited,
    read_delimited_file,
};
use rowcast_model::{
    DecodedRecord, FieldType, FromRecord, RawCell, ReadOptions, RecordSchema, RowDecodeError,
};
use rowcast_transform::Coercer;
use tempfile::NamedTempFile;

#[derive(Debug, PartialEq)]
struct Employee {
    name: Option<String>,
    age: Option<i32>,
    department: Option<String>,
    position: Option<String>,
    salary: Option<f64>,
    hire_date: Option<NaiveDate>,
    last_login: Option<NaiveDateTime>,
    is_active: Option<bool>,
}

impl FromRecord for Employee {
    fn from_record(record: DecodedRecord) -> Result<Self, RowDecodeError> {
        Ok(Self {
            name: record.text("name")?,
            age: record.integer("age")?,
            department: record.text("department")?,
            position: record.text("position")?,
            salary: record.decimal("salary")?,
            hire_date: record.date("hire_date")?,
            last_login: record.datetime("last_login")?,
            is_active: record.boolean("is_active")?,
        })
    }
}

const HEADER: &str = "이름,나이,부서,직급,연봉,입사일,최근 로그인,재직여부";

fn employee_schema() -> RecordSchema {
    RecordSchema::builder()
        .field("name", FieldType::Text)
        .field("age", FieldType::Integer)
        .field("department", FieldType::Text)
        .field("position", FieldType::Text)
        .field("salary", FieldType::Decimal)
        .field("hire_date", FieldType::Date)
        .field("last_login", FieldType::DateTime)
        .field("is_active", FieldType::Boolean)
        .build()
        .unwrap()
}

fn read_csv(body: &str, options: &ReadOptions) -> ReadOutcome<Employee> {
    let content = format!("{HEADER}\n{body}");
    read_delimited(
        Cursor::new(content),
        &employee_schema(),
        options,
        &Coercer::default(),
    )
    .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn reads_well_formed_csv() {
    let outcome = read_csv(
        "김철수,32,개발팀,대리,5500,2020-03-15,2025-12-08 09:30:00,true\n\
         이영희,28,마케팅팀,사원,4200,2022-06-01,2025-12-08 08:45:00,true\n",
        &ReadOptions::default(),
    );

    assert_eq!(outcome.count(), 2);
    let first = &outcome.records[0];
    assert_eq!(first.name.as_deref(), Some("김철수"));
    assert_eq!(first.age, Some(32));
    assert_eq!(first.department.as_deref(), Some("개발팀"));
    assert_eq!(first.salary, Some(5500.0));
    assert_eq!(first.hire_date, Some(date(2020, 3, 15)));
    assert_eq!(
        first.last_login,
        Some(date(2025, 12, 8).and_hms_opt(9, 30, 0).unwrap())
    );
    assert_eq!(first.is_active, Some(true));
}

#[test]
fn empty_fields_decode_as_absent() {
    let outcome = read_csv(
        "김철수,,개발팀,대리,,,,\n,30,,,,2021-01-01,2025-01-01 00:00:00,true\n",
        &ReadOptions::default(),
    );

    assert_eq!(outcome.count(), 2);
    let first = &outcome.records[0];
    assert_eq!(first.age, None);
    assert_eq!(first.salary, None);
    assert_eq!(first.hire_date, None);
    assert_eq!(first.is_active, None);
    let second = &outcome.records[1];
    assert_eq!(second.name, None);
    assert_eq!(second.age, Some(30));
    assert_eq!(second.hire_date, Some(date(2021, 1, 1)));
    assert_eq!(outcome.field_failures, 0);
}

#[test]
fn lenient_text_values() {
    let outcome = read_csv(
        "김철수,28세,개발팀,대리,\"5,500원\",,,Yes\n이영희,  35  ,마케팅팀,사원,  4200  ,,,TRUE\n",
        &ReadOptions::default(),
    );

    assert_eq!(outcome.records[0].age, Some(28));
    assert_eq!(outcome.records[0].salary, Some(5500.0));
    assert_eq!(outcome.records[0].is_active, Some(true));
    assert_eq!(outcome.records[1].age, Some(35));
    assert_eq!(outcome.records[1].salary, Some(4200.0));
    assert_eq!(outcome.records[1].is_active, Some(true));
}

#[test]
fn negative_zero_and_large_numbers() {
    let outcome = read_csv(
        "음수테스트,-5,개발팀,인턴,0,,,true\n큰숫자,999,임원,CEO,999999999,,,0\n",
        &ReadOptions::default(),
    );

    assert_eq!(outcome.records[0].age, Some(-5));
    assert_eq!(outcome.records[0].salary, Some(0.0));
    assert_eq!(outcome.records[1].salary, Some(999_999_999.0));
    assert_eq!(outcome.records[1].is_active, Some(false));
}

#[test]
fn blank_lines_are_skipped() {
    let outcome = read_csv(
        "김철수,32,개발팀,대리,5500,,,true\n\n,,,,,,\n이영희,28,마케팅팀,사원,4200,,,true\n",
        &ReadOptions::default(),
    );

    let names: Vec<_> = outcome
        .records
        .iter()
        .map(|employee| employee.name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("김철수"), Some("이영희")]);
    assert_eq!(outcome.skipped_empty, 2);
}

#[test]
fn unparsable_dates_leave_field_absent() {
    let outcome = read_csv(
        "김철수,30,개발팀,대리,5000,invalid-date,invalid-datetime,true\n",
        &ReadOptions::default(),
    );

    assert_eq!(outcome.count(), 1);
    assert_eq!(outcome.records[0].hire_date, None);
    assert_eq!(outcome.records[0].last_login, None);
    assert_eq!(outcome.field_failures, 2);
    assert!(outcome.failures.is_empty());
}

#[test]
fn mixed_date_formats() {
    let outcome = read_csv(
        "박민수,35,영업팀,과장,6000,2019/07/15,2025/12/07 18:00:00,true\n\
         최민지,31,기획팀,대리,5100,15/07/2019,2025-12-7 8:05,true\n",
        &ReadOptions::default(),
    );

    assert_eq!(outcome.records[0].hire_date, Some(date(2019, 7, 15)));
    assert_eq!(
        outcome.records[0].last_login,
        Some(date(2025, 12, 7).and_hms_opt(18, 0, 0).unwrap())
    );
    assert_eq!(outcome.records[1].hire_date, Some(date(2019, 7, 15)));
    assert_eq!(
        outcome.records[1].last_login,
        Some(date(2025, 12, 7).and_hms_opt(8, 5, 0).unwrap())
    );
}

#[test]
fn quoted_fields_keep_delimiters_and_quotes() {
    let outcome = read_csv(
        "이쉼표,30,\"개발팀, 마케팅팀\",대리,5500,,,true\n김철수,30,\"개발팀 \"\"핵심\"\"\",대리,5500,,,true\n",
        &ReadOptions::default(),
    );

    assert_eq!(
        outcome.records[0].department.as_deref(),
        Some("개발팀, 마케팅팀")
    );
    assert_eq!(
        outcome.records[1].department.as_deref(),
        Some("개발팀 \"핵심\"")
    );
}

#[test]
fn semicolon_delimiter() {
    let content = format!(
        "{}\n김철수;32;개발팀;대리;5500;2020-03-15;2025-12-08 09:30:00;true\n",
        HEADER.replace(',', ";")
    );
    let outcome: ReadOutcome<Employee> = read_delimited(
        Cursor::new(content),
        &employee_schema(),
        &ReadOptions::default().with_delimiter(';'),
        &Coercer::default(),
    )
    .unwrap();

    assert_eq!(outcome.count(), 1);
    assert_eq!(outcome.records[0].age, Some(32));
}

#[test]
fn mis_encoded_line_does_not_abort_the_read() {
    let mut content = format!("{HEADER}\n김철수,28\n").into_bytes();
    // EUC-KR bytes for a Korean name.
    content.extend_from_slice(b"\xB1\xE8,30\n");
    content.extend_from_slice("이영희,35\n".as_bytes());

    let outcome: ReadOutcome<Employee> = read_delimited(
        Cursor::new(content),
        &employee_schema(),
        &ReadOptions::default(),
        &Coercer::default(),
    )
    .unwrap();

    assert_eq!(outcome.count(), 3);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.records[1].age, Some(30));
    assert!(outcome.records[1].name.as_deref().unwrap().contains('\u{fffd}'));
    assert_eq!(outcome.records[2].name.as_deref(), Some("이영희"));
}

#[test]
fn failing_row_is_isolated() {
    let schema = RecordSchema::builder()
        .required_field("id", FieldType::Long)
        .field("name", FieldType::Text)
        .build()
        .unwrap();
    let content = "id,name\n1,Kim\nunknown,Lee\n3,Park\n4,Choi\n";
    let outcome: ReadOutcome<DecodedRecord> = read_delimited(
        Cursor::new(content),
        &schema,
        &ReadOptions::default(),
        &Coercer::default(),
    )
    .unwrap();

    assert_eq!(outcome.count(), 3);
    assert_eq!(outcome.dropped(), 1);
    assert_eq!(outcome.failures[0].index, 2);
    assert_eq!(outcome.failures[0].cause, RowDecodeError::missing("id"));
    let ids: Vec<_> = outcome
        .records
        .iter()
        .map(|record| record.long("id").unwrap())
        .collect();
    assert_eq!(ids, vec![Some(1), Some(3), Some(4)]);
}

#[test]
fn caller_validation_drops_the_row() {
    #[derive(Debug)]
    struct Adult {
        age: i32,
    }

    impl FromRecord for Adult {
        fn from_record(record: DecodedRecord) -> Result<Self, RowDecodeError> {
            let age = record
                .integer("age")?
                .ok_or_else(|| RowDecodeError::missing("age"))?;
            if age < 18 {
                return Err(RowDecodeError::Invalid(format!("age {age} is under 18")));
            }
            Ok(Self { age })
        }
    }

    let schema = RecordSchema::builder()
        .field("age", FieldType::Integer)
        .build()
        .unwrap();
    let outcome: ReadOutcome<Adult> = read_delimited(
        Cursor::new("age\n30\n12\n45\n"),
        &schema,
        &ReadOptions::default(),
        &Coercer::default(),
    )
    .unwrap();

    assert_eq!(outcome.records.iter().map(|a| a.age).collect::<Vec<_>>(), vec![30, 45]);
    assert_eq!(outcome.failures[0].to_string(), "row 2: age 12 is under 18");
}

fn employee_workbook() -> Workbook {
    let header: Vec<SheetCell> = HEADER.split(',').map(SheetCell::from).collect();
    let hired = date(2020, 3, 15).and_hms_opt(0, 0, 0).unwrap();
    let login = date(2025, 12, 8).and_hms_opt(9, 30, 0).unwrap();
    Workbook::new(vec![
        Sheet::new(
            "직원",
            vec![
                header,
                vec![
                    "김철수".into(),
                    32.0.into(),
                    "개발팀".into(),
                    "대리".into(),
                    5500.0.into(),
                    hired.into(),
                    login.into(),
                    true.into(),
                ],
                vec![RawCell::Absent.into(), "  ".into()],
                vec![
                    "이영희".into(),
                    "28세".into(),
                    SheetCell::error("#REF!"),
                    "사원".into(),
                    SheetCell::formula("4000+200", 4200.0),
                    "2022/6/1".into(),
                    RawCell::Absent.into(),
                    1.0.into(),
                ],
            ],
        ),
        Sheet::new("부서", vec![vec!["부서명".into()], vec!["개발팀".into()]]),
    ])
}

#[test]
fn reads_workbook_sheet() {
    let outcome: ReadOutcome<Employee> = read_all::<_, Cursor<Vec<u8>>>(
        Source::Workbook(employee_workbook()),
        &employee_schema(),
        &ReadOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.count(), 2);
    assert_eq!(outcome.skipped_empty, 1);
    let first = &outcome.records[0];
    assert_eq!(first.age, Some(32));
    assert_eq!(first.hire_date, Some(date(2020, 3, 15)));
    assert_eq!(first.salary, Some(5500.0));
    let second = &outcome.records[1];
    assert_eq!(second.age, Some(28));
    assert_eq!(second.department, None);
    assert_eq!(second.salary, Some(4200.0));
    assert_eq!(second.hire_date, Some(date(2022, 6, 1)));
    assert_eq!(second.is_active, Some(true));
}

#[test]
fn workbook_sheet_selection_errors_are_fatal() {
    let err = read_all::<Employee, Cursor<Vec<u8>>>(
        Source::Workbook(employee_workbook()),
        &employee_schema(),
        &ReadOptions::default().with_sheet_index(2),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::SheetIndexOutOfRange { index: 2, count: 2 }));
    assert!(err.is_source_selection());

    let err = read_all::<Employee, Cursor<Vec<u8>>>(
        Source::Workbook(employee_workbook()),
        &employee_schema(),
        &ReadOptions::default().with_sheet_name("급여"),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::SheetNotFound { .. }));
}

#[test]
fn reads_sheet_by_name() {
    let schema = RecordSchema::builder()
        .field("department", FieldType::Text)
        .build()
        .unwrap();
    let outcome: ReadOutcome<DecodedRecord> = read_all::<_, Cursor<Vec<u8>>>(
        Source::Workbook(employee_workbook()),
        &schema,
        &ReadOptions::default().with_sheet_name("부서"),
    )
    .unwrap();
    assert_eq!(outcome.count(), 1);
    assert_eq!(
        outcome.records[0].text("department").unwrap().as_deref(),
        Some("개발팀")
    );
}

#[test]
fn reads_files_from_disk() {
    let mut csv = NamedTempFile::with_suffix(".csv").unwrap();
    write!(csv, "\u{feff}{HEADER}\n김철수,32,개발팀,대리,5500,,,true\n").unwrap();
    let outcome: ReadOutcome<Employee> = read_delimited_file(
        csv.path(),
        &employee_schema(),
        &ReadOptions::default(),
        &Coercer::default(),
    )
    .unwrap();
    assert_eq!(outcome.count(), 1);

    let mut grid = NamedTempFile::with_suffix(".json").unwrap();
    write!(
        grid,
        r#"{{"sheets": [{{"name": "직원", "rows": [["이름", "나이"], ["김철수", 32], [null, null]]}}]}}"#
    )
    .unwrap();
    let source = Source::open(grid.path()).unwrap();
    assert!(matches!(source, Source::Workbook(_)));
    let outcome: ReadOutcome<Employee> =
        read_all(source, &employee_schema(), &ReadOptions::default()).unwrap();
    assert_eq!(outcome.count(), 1);
    assert_eq!(outcome.records[0].age, Some(32));
}

#[test]
fn missing_file_is_reported() {
    let err = Source::open(std::path::Path::new("/nonexistent/employees.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
