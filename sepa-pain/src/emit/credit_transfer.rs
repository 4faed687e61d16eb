//! Credit-transfer document writer
//!
//! Emits one `PmtInf` block per batch and one `CdtTrfTxInf` per transaction.
//! The Swiss dialect drops the per-batch transaction counters and the
//! service-level block and identifies the debtor agent through the national
//! clearing system instead of the BIC-or-nothing rule.

use crate::config::EmitConfig;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::grouping::{Batch, TransferGroupKey};
use crate::message::CreditTransfer;
use crate::transaction::CreditTransferTransaction;
use crate::types::Remittance;
use crate::xml::XmlBuilder;

use super::{
    bic_or_not_provided, bool_text, builder_for, close_document, format_amount, format_date,
    group_header, open_document, postal_address_transfer,
};

type TransferBatch<'a> = Batch<'a, CreditTransferTransaction, TransferGroupKey>;

pub(crate) fn document(
    message: &CreditTransfer,
    batches: &[TransferBatch<'_>],
    dialect: Dialect,
    config: &EmitConfig,
) -> Result<String> {
    let mut builder = builder_for(config);
    open_document(&mut builder, dialect)?;
    group_header(
        &mut builder,
        message.message_id(),
        message.created_at(),
        batches.iter().map(Batch::count).sum(),
        batches.iter().map(Batch::control_sum).sum(),
        &message.account().name,
    )?;
    for (position, batch) in batches.iter().enumerate() {
        payment_information(&mut builder, message, batch, position + 1, dialect)?;
    }
    close_document(&mut builder, dialect)?;
    builder.finish()
}

fn payment_information(
    builder: &mut XmlBuilder,
    message: &CreditTransfer,
    batch: &TransferBatch<'_>,
    position: usize,
    dialect: Dialect,
) -> Result<()> {
    let swiss = dialect.is_swiss();
    let account = message.account();

    builder.open("PmtInf")?;
    builder.leaf("PmtInfId", &format!("{}/{position}", message.message_id()))?;
    builder.leaf("PmtMtd", payment_method_code(batch))?;
    builder.leaf("BtchBookg", bool_text(batch.key.batch_booking))?;
    if !swiss {
        builder.leaf("NbOfTxs", &batch.count().to_string())?;
        builder.leaf("CtrlSum", &format_amount(batch.control_sum()))?;
        builder.open("PmtTpInf")?;
        builder.open("SvcLvl")?;
        builder.leaf("Cd", batch.key.service_level.unwrap_or_default().code())?;
        builder.close("SvcLvl")?;
        builder.close("PmtTpInf")?;
    }
    builder.leaf("ReqdExctnDt", &format_date(batch.key.requested_date))?;
    builder.open("Dbtr")?;
    builder.leaf("Nm", &account.name)?;
    builder.close("Dbtr")?;
    builder.open("DbtrAcct")?;
    builder.open("Id")?;
    builder.leaf("IBAN", &account.iban)?;
    builder.close("Id")?;
    builder.close("DbtrAcct")?;
    builder.open("DbtrAgt")?;
    builder.open("FinInstnId")?;
    if swiss {
        if let Some(bic) = &account.bic {
            builder.leaf("BIC", bic)?;
        }
        builder.open("ClrSysMmbId")?;
        builder.open("ClrSysId")?;
        builder.leaf("Cd", "CHBCC")?;
        builder.close("ClrSysId")?;
        if account.bic.is_none() {
            builder.leaf("MmbId", account.clearing_number.as_deref().unwrap_or("9000"))?;
        }
        builder.close("ClrSysMmbId")?;
    } else {
        bic_or_not_provided(builder, account.bic.as_deref())?;
    }
    builder.close("FinInstnId")?;
    builder.close("DbtrAgt")?;
    if !swiss {
        builder.leaf("ChrgBr", "SLEV")?;
    }
    for transaction in &batch.transactions {
        transaction_block(builder, transaction)?;
    }
    builder.close("PmtInf")
}

/// The Swiss payment method of the batch, `TRF` when its members carry none.
fn payment_method_code(batch: &TransferBatch<'_>) -> &'static str {
    batch
        .transactions
        .first()
        .and_then(|transaction| transaction.payment_method)
        .map(|method| method.code())
        .unwrap_or("TRF")
}

fn transaction_block(
    builder: &mut XmlBuilder,
    transaction: &CreditTransferTransaction,
) -> Result<()> {
    builder.open("CdtTrfTxInf")?;
    builder.open("PmtId")?;
    if let Some(instruction_id) = &transaction.instruction_id {
        builder.leaf("InstrId", instruction_id)?;
    }
    builder.leaf("EndToEndId", &transaction.reference)?;
    builder.close("PmtId")?;
    builder.open("Amt")?;
    builder.leaf_with(
        "InstdAmt",
        &format_amount(transaction.amount),
        &[("Ccy", &transaction.currency)],
    )?;
    builder.close("Amt")?;
    creditor_agent(builder, transaction)?;
    builder.open("Cdtr")?;
    builder.leaf("Nm", &transaction.name)?;
    if let Some(address) = &transaction.postal_address {
        builder.open("PstlAdr")?;
        postal_address_transfer(builder, address)?;
        builder.close("PstlAdr")?;
    }
    builder.close("Cdtr")?;
    builder.open("CdtrAcct")?;
    builder.open("Id")?;
    builder.leaf("IBAN", &transaction.iban)?;
    builder.close("Id")?;
    builder.close("CdtrAcct")?;
    remittance(builder, transaction)?;
    builder.close("CdtTrfTxInf")
}

/// `CdtrAgt` appears only when something identifies the creditor bank: a
/// BIC, a Swiss or Liechtenstein IBAN (whose institution id is embedded in
/// characters 4..9), an agent key-set on the payment classification, or an
/// explicit bank name or address.
fn creditor_agent(builder: &mut XmlBuilder, transaction: &CreditTransferTransaction) -> Result<()> {
    let agent = transaction.payment_type.creditor_agent();
    let national_iban =
        transaction.iban.starts_with("CH") || transaction.iban.starts_with("LI");
    let agent_identified = agent
        .map(|agent| agent.iid().is_some() || agent.bank_name().is_some())
        .unwrap_or(false);
    let identified = transaction.bic.is_some()
        || national_iban
        || agent_identified
        || transaction.creditor_bank_name.is_some()
        || transaction.creditor_bank_postal_address.is_some();
    if !identified {
        return Ok(());
    }

    builder.open("CdtrAgt")?;
    builder.open("FinInstnId")?;
    match &transaction.bic {
        Some(bic) => builder.leaf("BIC", bic)?,
        None => {
            let derived: String = transaction.iban.chars().skip(4).take(5).collect();
            let member_id = agent.and_then(|agent| agent.iid()).unwrap_or(&derived);
            builder.open("ClrSysMmbId")?;
            builder.open("ClrSysId")?;
            builder.leaf("Cd", "CHBCC")?;
            builder.close("ClrSysId")?;
            builder.leaf("MmbId", member_id)?;
            builder.close("ClrSysMmbId")?;
        }
    }
    let bank_name = transaction
        .creditor_bank_name
        .as_deref()
        .or_else(|| agent.and_then(|agent| agent.bank_name()));
    if let Some(name) = bank_name {
        builder.leaf("Nm", name)?;
    }
    if let Some(address) = &transaction.creditor_bank_postal_address {
        builder.open("PstlAdr")?;
        postal_address_transfer(builder, address)?;
        builder.close("PstlAdr")?;
    }
    builder.close("FinInstnId")?;
    builder.close("CdtrAgt")
}

fn remittance(builder: &mut XmlBuilder, transaction: &CreditTransferTransaction) -> Result<()> {
    match &transaction.remittance {
        Some(Remittance::Unstructured(text)) => {
            builder.open("RmtInf")?;
            builder.leaf("Ustrd", text)?;
            builder.close("RmtInf")
        }
        // Structured references pass compatibility only under the Swiss
        // dialect, so no dialect check is needed here.
        Some(Remittance::Structured(reference)) => structured_reference(builder, reference),
        None => match transaction.payment_type.reference_number() {
            Some(reference_number) => structured_reference(builder, reference_number),
            None => Ok(()),
        },
    }
}

fn structured_reference(builder: &mut XmlBuilder, reference: &str) -> Result<()> {
    builder.open("RmtInf")?;
    builder.open("Strd")?;
    builder.open("CdtrRefInf")?;
    builder.leaf("Ref", reference)?;
    builder.close("CdtrRefInf")?;
    builder.close("Strd")?;
    builder.close("RmtInf")
}
