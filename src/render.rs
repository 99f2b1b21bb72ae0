use std::io::Write;

use crate::domain::{Account, Error, Order, PaymentResult, Renderer};

/// Renders the visible panel as a CSV table: a header row, then one row per item.
#[derive(Debug)]
pub struct CsvOutput<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvOutput<W> {
    pub fn new(out: W) -> Self {
        let writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
        Self { writer }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    fn write_row<I, F>(&mut self, row: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = F>,
        F: AsRef<[u8]>,
    {
        self.writer
            .write_record(row)
            .map_err(|e| Error::IO(std::io::Error::other(e)))
    }
}

impl<W: Write> Renderer for CsvOutput<W> {
    fn account(&mut self, account: Option<&Account>) -> Result<(), Error> {
        self.write_row(["id", "user_id", "balance"])?;
        if let Some(account) = account {
            self.write_row([
                account.id.clone().unwrap_or_default(),
                account.user_id.clone(),
                account.balance.to_string(),
            ])?;
        }
        Ok(())
    }

    fn orders(&mut self, orders: &[Order]) -> Result<(), Error> {
        self.write_row(["id", "user_id", "amount", "description", "status"])?;
        for order in orders {
            self.write_row([
                order.id.clone(),
                order.user_id.clone(),
                order.amount.to_string(),
                order.description.clone(),
                order.status.to_string(),
            ])?;
        }
        Ok(())
    }

    fn payments(&mut self, results: &[PaymentResult]) -> Result<(), Error> {
        self.write_row(["order_id", "status", "message"])?;
        for result in results {
            self.write_row([
                result.order_id.clone().unwrap_or_default(),
                result.status_label().to_string(),
                result.message.clone(),
            ])?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush()?;
        Ok(())
    }
}
