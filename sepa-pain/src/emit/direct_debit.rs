//! Direct-debit document writer
//!
//! One `PmtInf` per batch, creditor-side blocks taken from the batch key's
//! effective account. The Swiss dialect replaces the SEPA service level with
//! the proprietary `CHDD` scheme, fixes both agents to clearing system
//! member `09000` and carries no mandate block and no per-batch counters.

use crate::config::EmitConfig;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::grouping::{Batch, DebitGroupKey};
use crate::message::DirectDebit;
use crate::transaction::DirectDebitTransaction;
use crate::types::MandateAmendment;
use crate::xml::XmlBuilder;

use super::{
    bic_or_not_provided, bool_text, builder_for, close_document, format_amount, format_date,
    group_header, open_document, postal_address_debit,
};

type DebitBatch<'a> = Batch<'a, DirectDebitTransaction, DebitGroupKey>;

pub(crate) fn document(
    message: &DirectDebit,
    batches: &[DebitBatch<'_>],
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
    message: &DirectDebit,
    batch: &DebitBatch<'_>,
    position: usize,
    dialect: Dialect,
) -> Result<()> {
    let swiss = dialect.is_swiss();
    let account = &batch.key.creditor_account;

    builder.open("PmtInf")?;
    builder.leaf("PmtInfId", &format!("{}/{position}", message.message_id()))?;
    builder.leaf("PmtMtd", "DD")?;
    if !swiss {
        builder.leaf("BtchBookg", bool_text(batch.key.batch_booking))?;
        builder.leaf("NbOfTxs", &batch.count().to_string())?;
        builder.leaf("CtrlSum", &format_amount(batch.control_sum()))?;
    }
    builder.open("PmtTpInf")?;
    builder.open("SvcLvl")?;
    if swiss {
        builder.leaf("Prtry", "CHDD")?;
    } else {
        builder.leaf("Cd", "SEPA")?;
    }
    builder.close("SvcLvl")?;
    builder.open("LclInstrm")?;
    if swiss {
        builder.leaf("Prtry", batch.key.local_instrument.code())?;
    } else {
        builder.leaf("Cd", batch.key.local_instrument.code())?;
    }
    builder.close("LclInstrm")?;
    if !swiss {
        builder.leaf("SeqTp", batch.key.sequence_type.code())?;
    }
    builder.close("PmtTpInf")?;
    builder.leaf("ReqdColltnDt", &format_date(batch.key.requested_date))?;
    builder.open("Cdtr")?;
    builder.leaf("Nm", &account.name)?;
    if let Some(address) = &account.postal_address {
        builder.open("PstlAdr")?;
        postal_address_debit(builder, address)?;
        builder.close("PstlAdr")?;
    }
    builder.close("Cdtr")?;
    builder.open("CdtrAcct")?;
    builder.open("Id")?;
    builder.leaf("IBAN", &account.iban)?;
    builder.close("Id")?;
    builder.close("CdtrAcct")?;
    builder.open("CdtrAgt")?;
    builder.open("FinInstnId")?;
    if swiss {
        builder.open("ClrSysMmbId")?;
        builder.leaf("MmbId", "09000")?;
        builder.close("ClrSysMmbId")?;
    } else {
        bic_or_not_provided(builder, account.bic.as_deref())?;
    }
    builder.close("FinInstnId")?;
    builder.close("CdtrAgt")?;
    if !swiss {
        builder.leaf("ChrgBr", "SLEV")?;
    }
    builder.open("CdtrSchmeId")?;
    builder.open("Id")?;
    builder.open("PrvtId")?;
    builder.open("Othr")?;
    builder.leaf(
        "Id",
        account.creditor_identifier.as_deref().unwrap_or_default(),
    )?;
    builder.open("SchmeNm")?;
    builder.leaf("Prtry", if swiss { "CHDD" } else { "SEPA" })?;
    builder.close("SchmeNm")?;
    builder.close("Othr")?;
    builder.close("PrvtId")?;
    builder.close("Id")?;
    builder.close("CdtrSchmeId")?;
    for transaction in &batch.transactions {
        transaction_block(builder, transaction, swiss)?;
    }
    builder.close("PmtInf")
}

fn transaction_block(
    builder: &mut XmlBuilder,
    transaction: &DirectDebitTransaction,
    swiss: bool,
) -> Result<()> {
    builder.open("DrctDbtTxInf")?;
    builder.open("PmtId")?;
    if let Some(instruction_id) = &transaction.instruction_id {
        builder.leaf("InstrId", instruction_id)?;
    }
    builder.leaf("EndToEndId", &transaction.reference)?;
    builder.close("PmtId")?;
    builder.leaf_with(
        "InstdAmt",
        &format_amount(transaction.amount),
        &[("Ccy", &transaction.currency)],
    )?;
    if !swiss {
        builder.open("DrctDbtTx")?;
        builder.open("MndtRltdInf")?;
        builder.leaf("MndtId", &transaction.mandate.id)?;
        builder.leaf("DtOfSgntr", &format_date(transaction.mandate.date_of_signature))?;
        if let Some(amendment) = &transaction.amendment {
            amendment_details(builder, amendment)?;
        }
        builder.close("MndtRltdInf")?;
        builder.close("DrctDbtTx")?;
    }
    builder.open("DbtrAgt")?;
    builder.open("FinInstnId")?;
    if swiss {
        builder.open("ClrSysMmbId")?;
        builder.leaf("MmbId", "09000")?;
        builder.close("ClrSysMmbId")?;
    } else {
        bic_or_not_provided(builder, transaction.bic.as_deref())?;
    }
    builder.close("FinInstnId")?;
    builder.close("DbtrAgt")?;
    builder.open("Dbtr")?;
    builder.leaf("Nm", &transaction.name)?;
    if let Some(address) = &transaction.postal_address {
        builder.open("PstlAdr")?;
        postal_address_debit(builder, address)?;
        builder.close("PstlAdr")?;
    }
    builder.close("Dbtr")?;
    builder.open("DbtrAcct")?;
    builder.open("Id")?;
    builder.leaf("IBAN", &transaction.iban)?;
    builder.close("Id")?;
    builder.close("DbtrAcct")?;
    if let Some(text) = &transaction.remittance_information {
        builder.open("RmtInf")?;
        builder.leaf("Ustrd", text)?;
        builder.close("RmtInf")?;
    }
    builder.close("DrctDbtTxInf")
}

/// The two amendment shapes share the indicator; the detail block is either
/// the original debtor IBAN or the `SMNDA` marker for a changed agent.
fn amendment_details(builder: &mut XmlBuilder, amendment: &MandateAmendment) -> Result<()> {
    builder.leaf("AmdmntInd", "true")?;
    builder.open("AmdmntInfDtls")?;
    match amendment {
        MandateAmendment::OriginalDebtorAccount(iban) => {
            builder.open("OrgnlDbtrAcct")?;
            builder.open("Id")?;
            builder.leaf("IBAN", iban)?;
            builder.close("Id")?;
            builder.close("OrgnlDbtrAcct")?;
        }
        MandateAmendment::DebtorAgentChanged => {
            builder.open("OrgnlDbtrAgt")?;
            builder.open("FinInstnId")?;
            builder.open("Othr")?;
            builder.leaf("Id", "SMNDA")?;
            builder.close("Othr")?;
            builder.close("FinInstnId")?;
            builder.close("OrgnlDbtrAgt")?;
        }
    }
    builder.close("AmdmntInfDtls")
}
