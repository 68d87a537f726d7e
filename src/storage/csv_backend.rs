use std::{
    fs::{self, File},
    io::Write,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    core::utils::ensure_dir,
    errors::{LedgerError, Result},
    ledger::{
        time_interval::{format_date, parse_date},
        transaction::check_amount,
        Category, EntryKind, Frequency, RecurringRule, Transaction,
    },
};

use super::RecordStore;

const TMP_SUFFIX: &str = "tmp";

/// A record type persisted as one row of a headed CSV file.
pub trait CsvRecord: Sized {
    type Row: Serialize + DeserializeOwned;

    const FILE_NAME: &'static str;
    const HEADERS: &'static [&'static str];

    fn from_row(row: Self::Row) -> Result<Self>;
    fn to_row(&self) -> Self::Row;
}

/// CSV-file-backed [`RecordStore`].
#[derive(Debug, Clone)]
pub struct CsvStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: CsvRecord> CsvStore<R> {
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            _record: PhantomData,
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::at_path(dir.join(R::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CsvStore<Transaction> {
    /// Deletes the ledger file. Returns whether a file existed.
    pub(crate) fn reset(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

impl<R> RecordStore for CsvStore<R>
where
    R: CsvRecord + Clone,
{
    type Record = R;

    fn load(&self) -> Result<Vec<R>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no store file yet, starting empty");
            return Ok(Vec::new());
        }
        // Only headers are trimmed; typed fields trim in their parsers and text stays verbatim.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;
        let headers = reader.byte_headers()?.clone();
        let mut raw = csv::ByteRecord::new();
        let mut records = Vec::new();
        while reader.read_byte_record(&mut raw)? {
            let line = raw.position().map_or(0, |pos| pos.line());
            let row: R::Row = raw.deserialize(Some(&headers))?;
            let record = R::from_row(row).map_err(|err| err.at_row(self.path.clone(), line))?;
            records.push(record);
        }
        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    fn replace_all(&self, records: &[R]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(R::HEADERS)?;
        for record in records {
            writer.serialize(record.to_row())?;
        }
        let data = writer.into_inner().map_err(|err| err.into_error())?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &data)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "wrote records");
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionRow {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Fixed", default)]
    fixed: String,
}

impl CsvRecord for Transaction {
    type Row = TransactionRow;

    const FILE_NAME: &'static str = "finance_data.csv";
    const HEADERS: &'static [&'static str] =
        &["Type", "Amount", "Date", "Description", "Category", "Fixed"];

    fn from_row(row: TransactionRow) -> Result<Self> {
        Ok(Transaction {
            kind: row.kind.parse()?,
            amount: parse_amount(&row.amount)?,
            date: parse_date(&row.date)?,
            description: row.description,
            category: row.category,
            fixed: parse_flag(&row.fixed)?,
        })
    }

    fn to_row(&self) -> TransactionRow {
        TransactionRow {
            kind: self.kind.label().to_string(),
            amount: self.amount.to_string(),
            date: format_date(self.date),
            description: self.description.clone(),
            category: self.category.clone(),
            fixed: format_flag(self.fixed),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryRow {
    #[serde(rename = "Category")]
    name: String,
    #[serde(rename = "Type")]
    kind: String,
}

impl CsvRecord for Category {
    type Row = CategoryRow;

    const FILE_NAME: &'static str = "categories.csv";
    const HEADERS: &'static [&'static str] = &["Category", "Type"];

    fn from_row(row: CategoryRow) -> Result<Self> {
        let kind: EntryKind = row.kind.parse()?;
        Ok(Category::new(row.name, kind))
    }

    fn to_row(&self) -> CategoryRow {
        CategoryRow {
            name: self.name.clone(),
            kind: self.kind.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecurringRuleRow {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Start Date")]
    start_date: String,
    #[serde(rename = "End Date", default)]
    end_date: Option<String>,
    #[serde(rename = "Frequency")]
    frequency: String,
}

impl CsvRecord for RecurringRule {
    type Row = RecurringRuleRow;

    const FILE_NAME: &'static str = "fixed_transactions.csv";
    const HEADERS: &'static [&'static str] = &[
        "Type",
        "Amount",
        "Description",
        "Category",
        "Start Date",
        "End Date",
        "Frequency",
    ];

    fn from_row(row: RecurringRuleRow) -> Result<Self> {
        let end_date = match row.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw)?),
        };
        let frequency: Frequency = row.frequency.parse()?;
        RecurringRule::new(
            row.kind.parse()?,
            parse_amount(&row.amount)?,
            row.description,
            row.category,
            parse_date(&row.start_date)?,
            end_date,
            frequency,
        )
    }

    fn to_row(&self) -> RecurringRuleRow {
        RecurringRuleRow {
            kind: self.kind.label().to_string(),
            amount: self.amount.to_string(),
            description: self.description.clone(),
            category: self.category.clone(),
            start_date: format_date(self.start_date),
            end_date: self.end_date.map(format_date),
            frequency: self.frequency.label().to_string(),
        }
    }
}

fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(trimmed.to_string()))?;
    check_amount(amount)
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim() {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" | "" => Ok(false),
        other => Err(LedgerError::Validation(format!(
            "invalid Fixed flag `{other}`"
        ))),
    }
}

fn format_flag(value: bool) -> String {
    let label = if value { "True" } else { "False" };
    label.to_string()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = TempDir::new().expect("temp dir");
        let store: CsvStore<Transaction> = CsvStore::in_dir(temp.path());
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn writes_original_column_layout() {
        let temp = TempDir::new().expect("temp dir");
        let store: CsvStore<Transaction> = CsvStore::in_dir(temp.path());
        let txn = Transaction {
            kind: EntryKind::Expense,
            amount: 42.5,
            date: date(2024, 3, 1),
            description: "Rent, March".into(),
            category: "Housing".into(),
            fixed: true,
        };
        store.append(txn.clone()).expect("append");

        let contents = fs::read_to_string(store.path()).expect("read file");
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("Type,Amount,Date,Description,Category,Fixed")
        );
        assert_eq!(
            lines.next(),
            Some("Expense,42.5,2024-03-01,\"Rent, March\",Housing,True")
        );
        assert_eq!(store.load().expect("reload"), vec![txn]);
    }

    #[test]
    fn empty_replace_keeps_header() {
        let temp = TempDir::new().expect("temp dir");
        let store: CsvStore<Category> = CsvStore::in_dir(temp.path());
        store.replace_all(&[]).expect("write");
        let contents = fs::read_to_string(store.path()).expect("read");
        assert_eq!(contents.trim_end(), "Category,Type");
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn reads_rules_written_by_the_dashboard_tool() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(RecurringRule::FILE_NAME);
        fs::write(
            &path,
            "Type,Amount,Description,Category,Start Date,End Date,Frequency\n\
             Expense,1200.0,Rent,Housing,2024-01-01,,Monthly\n\
             Income,50.0,Tutoring,Side,2024-01-06 00:00:00,2024-03-01,Weekly\n",
        )
        .expect("seed file");
        let store: CsvStore<RecurringRule> = CsvStore::at_path(path);
        let rules = store.load().expect("load rules");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].end_date, None);
        assert_eq!(rules[0].frequency, Frequency::Monthly);
        assert_eq!(rules[1].start_date, date(2024, 1, 6));
        assert_eq!(rules[1].end_date, Some(date(2024, 3, 1)));
    }

    #[test]
    fn unknown_frequency_is_reported_with_its_line() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(RecurringRule::FILE_NAME);
        fs::write(
            &path,
            "Type,Amount,Description,Category,Start Date,End Date,Frequency\n\
             Expense,10,Paper,News,2024-01-01,,Monthly\n\
             Expense,10,Milk,Food,2024-01-01,,Fortnightly\n",
        )
        .expect("seed file");
        let store: CsvStore<RecurringRule> = CsvStore::at_path(path);
        let err = store.load().expect_err("bad frequency");
        match err {
            LedgerError::Row { line, source, .. } => {
                assert_eq!(line, 3);
                assert!(matches!(*source, LedgerError::UnknownFrequency(ref v) if v == "Fortnightly"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn padded_text_survives_a_reload() {
        let temp = TempDir::new().expect("temp dir");
        let store: CsvStore<Transaction> = CsvStore::in_dir(temp.path());
        let txn = Transaction {
            kind: EntryKind::Income,
            amount: 7.0,
            date: date(2024, 5, 2),
            description: "  padded  ".into(),
            category: " Side gig".into(),
            fixed: false,
        };
        store.append(txn.clone()).expect("append");
        assert_eq!(store.load().expect("reload"), vec![txn.clone()]);

        let next = Transaction {
            description: "Next".into(),
            ..txn.clone()
        };
        store.append(next.clone()).expect("second append");
        assert_eq!(store.load().expect("reload"), vec![txn, next]);
    }

    #[test]
    fn typed_fields_tolerate_surrounding_spaces() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(Transaction::FILE_NAME);
        fs::write(
            &path,
            "Type, Amount ,Date,Description,Category,Fixed\n\
             Expense , 12.5 , 2024-01-03 ,Lunch,Food, False\n",
        )
        .expect("seed file");
        let store: CsvStore<Transaction> = CsvStore::at_path(path);
        let ledger = store.load().expect("load");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].kind, EntryKind::Expense);
        assert_eq!(ledger[0].amount, 12.5);
        assert_eq!(ledger[0].date, date(2024, 1, 3));
        assert!(!ledger[0].fixed);
    }

    #[test]
    fn error_line_counts_multiline_fields() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(RecurringRule::FILE_NAME);
        fs::write(
            &path,
            "Type,Amount,Description,Category,Start Date,End Date,Frequency\n\
             Expense,10,\"Paper\nand ink\",News,2024-01-01,,Monthly\n\
             Expense,10,Milk,Food,2024-01-01,,Fortnightly\n",
        )
        .expect("seed file");
        let store: CsvStore<RecurringRule> = CsvStore::at_path(path);
        match store.load().expect_err("bad frequency") {
            LedgerError::Row { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reset_removes_only_existing_file() {
        let temp = TempDir::new().expect("temp dir");
        let store: CsvStore<Transaction> = CsvStore::in_dir(temp.path());
        assert!(!store.reset().expect("reset missing"));
        store.replace_all(&[]).expect("write");
        assert!(store.reset().expect("reset existing"));
        assert!(!store.path().exists());
    }
}
