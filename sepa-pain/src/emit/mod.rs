//! Document emission
//!
//! Serializers for the two message kinds. They walk pre-validated,
//! pre-grouped data only; every compatibility decision has already been
//! made, so the writers here translate state into markup and never reject
//! anything.

pub(crate) mod credit_transfer;
pub(crate) mod direct_debit;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::address::PostalAddress;
use crate::config::EmitConfig;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::xml::XmlBuilder;

/// Amounts always carry exactly two fraction digits. Values are rounded at
/// construction, so this only pads.
pub(crate) fn format_amount(amount: Decimal) -> String {
    format!("{amount:.2}")
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Opens the declaration, `Document` root and content tag for `dialect`.
pub(crate) fn open_document(builder: &mut XmlBuilder, dialect: Dialect) -> Result<()> {
    builder.declaration()?;
    builder.open_with(
        "Document",
        &[
            ("xmlns", dialect.namespace()),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ("xsi:schemaLocation", &dialect.schema_location()),
        ],
    )?;
    builder.open(dialect.root_tag())
}

pub(crate) fn close_document(builder: &mut XmlBuilder, dialect: Dialect) -> Result<()> {
    builder.close(dialect.root_tag())?;
    builder.close("Document")
}

pub(crate) fn builder_for(config: &EmitConfig) -> XmlBuilder {
    if config.pretty_print {
        XmlBuilder::pretty(config.indent_width)
    } else {
        XmlBuilder::compact()
    }
}

/// `GrpHdr` with the totals over all batches.
pub(crate) fn group_header(
    builder: &mut XmlBuilder,
    message_id: &str,
    created_at: DateTime<Utc>,
    transaction_count: usize,
    control_sum: Decimal,
    initiating_party: &str,
) -> Result<()> {
    builder.open("GrpHdr")?;
    builder.leaf("MsgId", message_id)?;
    builder.leaf("CreDtTm", &format_timestamp(created_at))?;
    builder.leaf("NbOfTxs", &transaction_count.to_string())?;
    builder.leaf("CtrlSum", &format_amount(control_sum))?;
    builder.open("InitgPty")?;
    builder.leaf("Nm", initiating_party)?;
    builder.close("InitgPty")?;
    builder.close("GrpHdr")
}

/// `BIC` when present, `Othr/Id = NOTPROVIDED` otherwise. The international
/// agent fallback; the Swiss dialects use clearing-system blocks instead.
pub(crate) fn bic_or_not_provided(builder: &mut XmlBuilder, bic: Option<&str>) -> Result<()> {
    match bic {
        Some(bic) => builder.leaf("BIC", bic),
        None => {
            builder.open("Othr")?;
            builder.leaf("Id", "NOTPROVIDED")?;
            builder.close("Othr")
        }
    }
}

/// Postal address in the credit-transfer field order, country last.
pub(crate) fn postal_address_transfer(
    builder: &mut XmlBuilder,
    address: &PostalAddress,
) -> Result<()> {
    if let Some(street_name) = &address.street_name {
        builder.leaf("StrtNm", street_name)?;
    }
    if let Some(building_number) = &address.building_number {
        builder.leaf("BldgNb", building_number)?;
    }
    if let Some(postal_code) = &address.postal_code {
        builder.leaf("PstCd", postal_code)?;
    }
    if let Some(town_name) = &address.town_name {
        builder.leaf("TwnNm", town_name)?;
    }
    if let Some(line) = &address.address_line_1 {
        builder.leaf("AdrLine", line)?;
    }
    if let Some(line) = &address.address_line_2 {
        builder.leaf("AdrLine", line)?;
    }
    if let Some(country) = &address.country {
        builder.leaf("Ctry", country)?;
    }
    Ok(())
}

/// Postal address in the direct-debit field order, country first and no
/// building number.
pub(crate) fn postal_address_debit(
    builder: &mut XmlBuilder,
    address: &PostalAddress,
) -> Result<()> {
    if let Some(country) = &address.country {
        builder.leaf("Ctry", country)?;
    }
    if let Some(street_name) = &address.street_name {
        builder.leaf("StrtNm", street_name)?;
    }
    if let Some(postal_code) = &address.postal_code {
        builder.leaf("PstCd", postal_code)?;
    }
    if let Some(town_name) = &address.town_name {
        builder.leaf("TwnNm", town_name)?;
    }
    if let Some(line) = &address.address_line_1 {
        builder.leaf("AdrLine", line)?;
    }
    if let Some(line) = &address.address_line_2 {
        builder.leaf("AdrLine", line)?;
    }
    Ok(())
}
