//! Builds one credit-transfer and one direct-debit document and prints
//! both to stdout. Run with `cargo run --example generate`.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use sepa_pain::{
    Account, CreditTransfer, CreditTransferTransaction, DirectDebit, DirectDebitTransaction,
    LocalInstrument, Mandate, PaymentType, ServiceLevel,
};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let execution_date = Local::now().date_naive() + Duration::days(2);

    let mut transfer = CreditTransfer::new(
        Account::new("Muster AG", "DE87200500001234567890").with_bic("BANKDEFFXXX"),
    );
    transfer.add_transaction(
        CreditTransferTransaction::builder(
            "Telekomiker AG",
            "DE37112589611964645802",
            Decimal::new(10250, 2),
        )
        .bic("PBNKDEFF370")
        .reference("XYZ-1234/123")
        .remittance_information("Rechnung R-703")
        .requested_date(execution_date)
        .build(),
    );
    transfer.add_transaction(
        CreditTransferTransaction::builder(
            "Amazonas GmbH",
            "AT611904300234573201",
            Decimal::new(59800, 2),
        )
        .payment_type(PaymentType::Sepa {
            service_level: ServiceLevel::Urgent,
        })
        .reference("XYZ-5678/456")
        .remittance_information("Rechnung R-704")
        .requested_date(execution_date)
        .build(),
    );

    let dialect = transfer
        .compatible_dialects()
        .into_iter()
        .next()
        .context("no dialect accepts every credit transfer")?;
    info!("Emitting credit transfer as {}", dialect);
    println!("{}", transfer.to_xml(dialect)?);

    let collection_date = Local::now().date_naive() + Duration::days(5);
    let signature = NaiveDate::from_ymd_opt(2026, 3, 2).context("invalid signature date")?;

    let mut debit = DirectDebit::new(
        Account::new("Muster AG", "CH5800791123000889012")
            .with_creditor_identifier("CH13ZZZ00000012345"),
    );
    debit.add_transaction(
        DirectDebitTransaction::builder(
            "Hans Muster",
            "CH6309000000250097798",
            Decimal::new(19995, 2),
            Mandate::new("M-2026-0042", signature),
        )
        .currency("CHF")
        .local_instrument(LocalInstrument::DdCor1)
        .reference("RECHNUNG-2026-0815")
        .remittance_information("Jahresbeitrag 2026")
        .requested_date(collection_date)
        .build(),
    );

    let dialect = debit
        .compatible_dialects()
        .into_iter()
        .next()
        .context("no dialect accepts every direct debit")?;
    info!("Emitting direct debit as {}", dialect);
    println!("{}", debit.to_xml(dialect)?);

    Ok(())
}
