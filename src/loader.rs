use crate::error::{DashboardError, Result};
use crate::types::{
    CountRow, Dataset, RawRow, Record, COL_FATALITIES, COL_INCIDENTS, COL_MINOR, COL_REGION,
    COL_REPORTED, COL_SERIOUS, COL_SUB_REGION, REQUIRED_COLUMNS,
};
use crate::util::{clean_text, parse_count_safe};
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Tried in order; the first one that yields a complete header wins.
    pub encodings: Vec<&'static Encoding>,
    /// Fail the whole load on the first row with a bad count.
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encodings: vec![encoding_rs::EUC_KR, encoding_rs::UTF_8],
            strict: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub malformed_rows: usize,
    pub encoding: &'static str,
}

/// Map a user-supplied label to an encoding. Accepts WHATWG labels plus
/// the common `cp949` spelling.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    let lookup = match normalized.as_str() {
        "cp949" | "ms949" | "uhc" => "euc-kr",
        other => other,
    };
    Encoding::for_label(lookup.as_bytes())
        .ok_or_else(|| DashboardError::UnknownEncoding(label.to_string()))
}

/// Load the accident CSV at `path` and add the total-victims column.
pub fn load(path: &Path, options: &LoadOptions) -> Result<(Dataset, LoadReport)> {
    if !path.exists() {
        return Err(DashboardError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path)?;

    let mut tried: Vec<String> = Vec::new();
    let mut header_error: Option<DashboardError> = None;
    for &encoding in &options.encodings {
        tried.push(encoding.name().to_string());
        let Some(text) = decode_strict(encoding, &bytes) else {
            log::warn!("{} is not valid {}", path.display(), encoding.name());
            continue;
        };
        match parse_rows(&text, options.strict) {
            Ok(parsed) => {
                let report = LoadReport {
                    total_rows: parsed.total_rows,
                    loaded_rows: parsed.rows.len(),
                    malformed_rows: parsed.malformed_rows,
                    encoding: encoding.name(),
                };
                log::info!(
                    "loaded {} rows from {} as {}",
                    report.loaded_rows,
                    path.display(),
                    report.encoding
                );
                return Ok((annotate(parsed.rows), report));
            }
            Err(e @ DashboardError::MissingColumns { .. }) => {
                log::warn!("decoding as {} gave an unusable header: {e}", encoding.name());
                header_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(header_error.unwrap_or(DashboardError::Decode {
        path: path.to_path_buf(),
        tried,
    }))
}

/// Add the derived total-victims column to every parsed row.
pub fn annotate(rows: Vec<CountRow>) -> Dataset {
    Dataset::new(rows.into_iter().map(Record::annotated).collect())
}

fn decode_strict<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    let bytes = if encoding == encoding_rs::UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

struct ParsedRows {
    rows: Vec<CountRow>,
    total_rows: usize,
    malformed_rows: usize,
}

fn parse_rows(text: &str, strict: bool) -> Result<ParsedRows> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::MissingColumns { columns: missing });
    }

    let mut rows = Vec::new();
    let mut total_rows = 0usize;
    let mut malformed_rows = 0usize;
    let mut record = StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if !strict => {
                total_rows += 1;
                malformed_rows += 1;
                log::warn!("skipping unreadable row: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
        total_rows += 1;
        let line = record.position().map_or(0, |p| p.line());

        let parsed = record
            .deserialize::<RawRow>(Some(&headers))
            .map_err(|e| ("row", e.to_string()))
            .and_then(to_count_row);
        match parsed {
            Ok(row) => rows.push(row),
            Err((column, value)) if strict => {
                return Err(DashboardError::MalformedRow {
                    line,
                    column: column.to_string(),
                    value,
                });
            }
            Err((column, value)) => {
                malformed_rows += 1;
                log::warn!("skipping line {line}: column '{column}' has value '{value}'");
            }
        }
    }

    Ok(ParsedRows {
        rows,
        total_rows,
        malformed_rows,
    })
}

/// On failure returns the offending column and its raw value.
fn to_count_row(raw: RawRow) -> std::result::Result<CountRow, (&'static str, String)> {
    fn count(
        column: &'static str,
        value: Option<String>,
    ) -> std::result::Result<u64, (&'static str, String)> {
        parse_count_safe(value.as_deref()).ok_or_else(|| (column, value.unwrap_or_default()))
    }

    let region = clean_text(raw.region).ok_or((COL_REGION, String::new()))?;
    let sub_region = clean_text(raw.sub_region).ok_or((COL_SUB_REGION, String::new()))?;
    Ok(CountRow {
        region,
        sub_region,
        incidents: count(COL_INCIDENTS, raw.incidents)?,
        fatalities: count(COL_FATALITIES, raw.fatalities)?,
        serious_injuries: count(COL_SERIOUS, raw.serious_injuries)?,
        minor_injuries: count(COL_MINOR, raw.minor_injuries)?,
        reported_injuries: count(COL_REPORTED, raw.reported_injuries)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
시도,시군구,사고건수,사망자수,중상자수,경상자수,부상신고자수,비고
서울,종로구,10,1,2,5,1,x
서울,강남구,20,0,3,10,2,
부산,중구,\"1,200\",4,100,900,50,
";

    fn write_fixture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn missing_file_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingInputFile { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn loads_euc_kr_file_on_first_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(SAMPLE);
        assert!(!had_errors);
        let path = write_fixture(&dir, "euc.csv", &bytes);

        let (ds, report) = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(report.encoding, "EUC-KR");
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(report.malformed_rows, 0);
        assert_eq!(ds.records()[0].region, "서울");
        assert_eq!(ds.records()[2].incidents, 1200);
    }

    #[test]
    fn falls_back_to_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "utf8.csv", SAMPLE.as_bytes());

        let (ds, report) = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(report.encoding, "UTF-8");
        assert_eq!(ds.records().len(), 3);
        assert_eq!(ds.records()[1].sub_region, "강남구");
    }

    #[test]
    fn strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(SAMPLE.as_bytes());
        let path = write_fixture(&dir, "bom.csv", &bytes);

        let options = LoadOptions {
            encodings: vec![encoding_rs::UTF_8],
            strict: false,
        };
        let (ds, _) = load(&path, &options).unwrap();
        assert_eq!(ds.regions(), vec!["서울", "부산"]);
    }

    #[test]
    fn undecodable_bytes_fail_with_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "junk.csv", &[0xFF, 0xFF, 0xFF, b'\n']);
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        match err {
            DashboardError::Decode { tried, .. } => assert_eq!(tried, vec!["EUC-KR", "UTF-8"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn derives_total_victims_for_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "utf8.csv", SAMPLE.as_bytes());
        let (ds, _) = load(&path, &LoadOptions::default()).unwrap();
        for r in ds.records() {
            assert_eq!(
                r.total_victims(),
                r.fatalities + r.serious_injuries + r.minor_injuries + r.reported_injuries
            );
        }
        assert_eq!(ds.records()[0].total_victims(), 9);
    }

    #[test]
    fn missing_columns_are_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "cols.csv", "시도,시군구,사고건수\n서울,종로구,1\n".as_bytes());
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        match err {
            DashboardError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["사망자수", "중상자수", "경상자수", "부상신고자수"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    const WITH_BAD_ROW: &str = "\
시도,시군구,사고건수,사망자수,중상자수,경상자수,부상신고자수
서울,종로구,10,1,2,5,1
서울,중구,abc,1,2,5,1
부산,중구,3,-1,0,0,0
";

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "bad.csv", WITH_BAD_ROW.as_bytes());
        let (ds, report) = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(report.malformed_rows, 2);
        assert_eq!(ds.records()[0].sub_region, "종로구");
    }

    #[test]
    fn strict_mode_rejects_first_malformed_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "bad.csv", WITH_BAD_ROW.as_bytes());
        let options = LoadOptions {
            strict: true,
            ..LoadOptions::default()
        };
        match load(&path, &options).unwrap_err() {
            DashboardError::MalformedRow {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "사고건수");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolves_encoding_labels() {
        assert_eq!(resolve_encoding("cp949").unwrap(), encoding_rs::EUC_KR);
        assert_eq!(resolve_encoding("UTF-8").unwrap(), encoding_rs::UTF_8);
        assert!(matches!(
            resolve_encoding("klingon"),
            Err(DashboardError::UnknownEncoding(_))
        ));
    }
}
