use std::io::{BufRead, BufReader, Read};
use std::pin::Pin;

use futures::stream::{self, Stream};

use crate::domain::{Action, ActionStream, Error, Tab};

/// Reads a script of UI actions, one per line, fields separated by commas:
///
/// ```text
/// user, alice
/// create-account
/// deposit, 50      # comments run to the end of the line
/// create-order, 20, "lamp, brass #2"
/// pay
/// ```
///
/// A `#` outside double quotes starts a comment, wherever it sits on the line.
pub struct CsvReader<R: Read> {
    reader: Option<R>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        Ok(Self {
            reader: Some(reader),
        })
    }
}

/// Internal shape used only to turn a CSV row into an action.
#[derive(Debug)]
struct ScriptRow {
    line: u64,
    fields: Vec<String>,
}

impl ScriptRow {
    fn parse(line: u64, text: &str) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let record = match rdr.records().next() {
            Some(record) => record
                .map_err(|e| Error::Ingestion(format!("line {}: CSV read error: {}", line, e)))?,
            None => csv::StringRecord::new(),
        };

        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        Ok(Self { line, fields })
    }
}

/// Drops the comment from a script line and the padding around each field, so
/// a quoted field still opens with its quote once handed to the CSV parser.
fn clean_line(line: &str) -> String {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                field.push(c);
            }
            '#' if !quoted => break,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    let fields: Vec<&str> = fields.iter().map(|f| f.trim()).collect();
    fields.join(",")
}

impl TryFrom<ScriptRow> for Action {
    type Error = Error;

    fn try_from(row: ScriptRow) -> Result<Self, Self::Error> {
        let line = row.line;
        let mut fields = row.fields.into_iter();
        let verb = fields.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<String> = fields.collect();

        let arity = |min: usize, max: usize| -> Result<(), Error> {
            if args.len() < min || args.len() > max {
                return Err(Error::Ingestion(format!(
                    "line {}: '{}' takes {} to {} arguments, got {}",
                    line,
                    verb,
                    min,
                    max,
                    args.len()
                )));
            }
            Ok(())
        };
        let optional = |i: usize| args.get(i).filter(|a| !a.is_empty()).cloned();

        let action = match verb.as_str() {
            "tab" => {
                arity(1, 1)?;
                let tab = Tab::parse(&args[0]).ok_or_else(|| {
                    Error::Ingestion(format!("line {}: unknown tab '{}'", line, args[0]))
                })?;
                Action::SelectTab(tab)
            }
            "user" => {
                arity(1, 1)?;
                Action::SetUser(args[0].clone())
            }
            "create-order" => {
                arity(1, 2)?;
                Action::CreateOrder {
                    amount: args[0].clone(),
                    description: optional(1).unwrap_or_default(),
                }
            }
            "list-orders" => {
                arity(0, 0)?;
                Action::ListOrders
            }
            "get-order" => {
                arity(1, 1)?;
                Action::GetOrder {
                    order_id: args[0].clone(),
                }
            }
            "create-account" => {
                arity(0, 0)?;
                Action::CreateAccount
            }
            "get-account" => {
                arity(0, 0)?;
                Action::GetAccount
            }
            "deposit" => {
                arity(1, 1)?;
                Action::Deposit {
                    amount: args[0].clone(),
                }
            }
            "pay" => {
                arity(0, 2)?;
                Action::Pay {
                    order_id: optional(0),
                    amount: optional(1),
                }
            }
            "" => {
                return Err(Error::Ingestion(format!("line {}: missing action", line)));
            }
            other => {
                return Err(Error::Ingestion(format!(
                    "line {}: unknown action '{}'",
                    line, other
                )));
            }
        };

        Ok(action)
    }
}

impl<R: Read + Send + 'static> ActionStream for CsvReader<R> {
    type Actions = Pin<Box<dyn Stream<Item = Result<Action, Error>> + Send>>;

    fn stream(&mut self) -> Self::Actions {
        let reader = match self.reader.take() {
            Some(r) => r,
            None => return Box::pin(stream::iter(Vec::<Result<Action, Error>>::new())),
        };

        // A read error ends the script; the reader may not be able to move past it.
        let lines = BufReader::new(reader)
            .lines()
            .scan(false, |failed, line| {
                if *failed {
                    return None;
                }
                *failed = line.is_err();
                Some(line)
            });

        let iter = lines.enumerate().filter_map(|(i, line)| {
            let line_no = i as u64 + 1;
            let text = match line {
                Ok(text) => text,
                Err(e) => {
                    return Some(Err(Error::Ingestion(format!(
                        "line {}: read error: {}",
                        line_no, e
                    ))));
                }
            };

            let body = clean_line(&text);
            if body.is_empty() {
                return None;
            }
            Some(ScriptRow::parse(line_no, &body).and_then(Action::try_from))
        });

        Box::pin(stream::iter(iter))
    }
}
