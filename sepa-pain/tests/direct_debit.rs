//! End-to-end direct-debit document tests
//!
//! Serializes complete pain.008 messages and checks the emitted markup:
//! the creditor scheme block, mandate data and amendments, the Swiss
//! national shape, creditor-account overrides, and the error paths.

use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use sepa_pain::{
    Account, Dialect, DirectDebit, DirectDebitTransaction, EmitConfig, Error, LocalInstrument,
    Mandate, MandateAmendment, PostalAddress, SequenceType,
};

fn compact() -> EmitConfig {
    EmitConfig {
        pretty_print: false,
        indent_width: 2,
    }
}

fn tomorrow() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
}

fn signature_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn creditor() -> Account {
    Account::new("Gläubiger GmbH", "DE87200500001234567890")
        .with_bic("BANKDEFFXXX")
        .with_creditor_identifier("DE98ZZZ09999999999")
}

fn collection(amount: Decimal) -> DirectDebitTransaction {
    DirectDebitTransaction::builder(
        "Zahlemann & Söhne GbR",
        "DE21500500009876543210",
        amount,
        Mandate::new("K-02-2026-42123", signature_date()),
    )
    .bic("SPUEDE2UXXX")
    .reference("XYZ/2026-08/1234")
    .remittance_information("Vielen Dank")
    .build()
}

fn message_with(transactions: Vec<DirectDebitTransaction>) -> DirectDebit {
    let mut message = DirectDebit::new(creditor()).with_message_id("MSG-1");
    for transaction in transactions {
        message.add_transaction(transaction);
    }
    message
}

#[test]
fn international_document_carries_every_required_block() {
    let message = message_with(vec![collection(Decimal::new(3950, 2))]);
    let xml = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Document "));
    assert!(xml.contains("xmlns=\"urn:iso:std:iso:20022:tech:xsd:pain.008.001.02\""));
    assert!(xml.contains(
        "xsi:schemaLocation=\"urn:iso:std:iso:20022:tech:xsd:pain.008.001.02 pain.008.001.02.xsd\""
    ));
    assert!(xml.contains("<CstmrDrctDbtInitn>"));

    assert!(xml.contains("<MsgId>MSG-1</MsgId>"));
    assert!(xml.contains("<NbOfTxs>1</NbOfTxs>"));
    assert!(xml.contains("<CtrlSum>39.50</CtrlSum>"));
    assert!(xml.contains("<InitgPty><Nm>Glaeubiger GmbH</Nm></InitgPty>"));

    assert!(xml.contains("<PmtInfId>MSG-1/1</PmtInfId>"));
    assert!(xml.contains("<PmtMtd>DD</PmtMtd>"));
    assert!(xml.contains("<BtchBookg>true</BtchBookg>"));
    assert!(xml.contains(
        "<PmtTpInf><SvcLvl><Cd>SEPA</Cd></SvcLvl><LclInstrm><Cd>CORE</Cd></LclInstrm>\
         <SeqTp>OOFF</SeqTp></PmtTpInf>"
    ));
    assert!(xml.contains(&format!(
        "<ReqdColltnDt>{}</ReqdColltnDt>",
        tomorrow().format("%Y-%m-%d")
    )));
    assert!(xml.contains("<Cdtr><Nm>Glaeubiger GmbH</Nm></Cdtr>"));
    assert!(xml.contains("<CdtrAcct><Id><IBAN>DE87200500001234567890</IBAN></Id></CdtrAcct>"));
    assert!(xml.contains("<CdtrAgt><FinInstnId><BIC>BANKDEFFXXX</BIC></FinInstnId></CdtrAgt>"));
    assert!(xml.contains("<ChrgBr>SLEV</ChrgBr>"));
    assert!(xml.contains(
        "<CdtrSchmeId><Id><PrvtId><Othr><Id>DE98ZZZ09999999999</Id>\
         <SchmeNm><Prtry>SEPA</Prtry></SchmeNm></Othr></PrvtId></Id></CdtrSchmeId>"
    ));

    assert!(xml.contains("<PmtId><EndToEndId>XYZ/2026-08/1234</EndToEndId></PmtId>"));
    // The instructed amount rides directly on the transaction, without the
    // credit-transfer Amt wrapper.
    assert!(xml.contains("<InstdAmt Ccy=\"EUR\">39.50</InstdAmt>"));
    assert!(!xml.contains("<Amt>"));
    assert!(xml.contains(
        "<DrctDbtTx><MndtRltdInf><MndtId>K-02-2026-42123</MndtId>\
         <DtOfSgntr>2026-01-15</DtOfSgntr></MndtRltdInf></DrctDbtTx>"
    ));
    assert!(xml.contains("<DbtrAgt><FinInstnId><BIC>SPUEDE2UXXX</BIC></FinInstnId></DbtrAgt>"));
    assert!(xml.contains("<Dbtr><Nm>Zahlemann + Soehne GbR</Nm></Dbtr>"));
    assert!(xml.contains("<DbtrAcct><Id><IBAN>DE21500500009876543210</IBAN></Id></DbtrAcct>"));
    assert!(xml.contains("<RmtInf><Ustrd>Vielen Dank</Ustrd></RmtInf>"));
    assert!(xml.ends_with("</DrctDbtTxInf></PmtInf></CstmrDrctDbtInitn></Document>"));
}

#[test]
fn missing_bics_fall_back_to_not_provided() {
    let account = Account::new("Gläubiger GmbH", "DE87200500001234567890")
        .with_creditor_identifier("DE98ZZZ09999999999");
    let mut message = DirectDebit::new(account).with_message_id("MSG-1");
    let mut transaction = collection(Decimal::new(1000, 2));
    transaction.bic = None;
    message.add_transaction(transaction);
    let xml = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap();

    assert!(xml.contains(
        "<CdtrAgt><FinInstnId><Othr><Id>NOTPROVIDED</Id></Othr></FinInstnId></CdtrAgt>"
    ));
    assert!(xml.contains(
        "<DbtrAgt><FinInstnId><Othr><Id>NOTPROVIDED</Id></Othr></FinInstnId></DbtrAgt>"
    ));
}

#[test]
fn amendment_carries_the_original_debtor_account() {
    let mut transaction = collection(Decimal::new(1000, 2));
    transaction.sequence_type = SequenceType::First;
    transaction.amendment = Some(MandateAmendment::OriginalDebtorAccount(
        "DE89370400440532013000".to_string(),
    ));
    let message = message_with(vec![transaction]);
    let xml = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap();

    assert!(xml.contains("<SeqTp>FRST</SeqTp>"));
    assert!(xml.contains("<AmdmntInd>true</AmdmntInd>"));
    assert!(xml.contains(
        "<AmdmntInfDtls><OrgnlDbtrAcct><Id><IBAN>DE89370400440532013000</IBAN></Id>\
         </OrgnlDbtrAcct></AmdmntInfDtls>"
    ));
}

#[test]
fn changed_debtor_agent_emits_the_smnda_marker() {
    let mut transaction = collection(Decimal::new(1000, 2));
    transaction.amendment = Some(MandateAmendment::DebtorAgentChanged);
    let message = message_with(vec![transaction]);
    let xml = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap();

    assert!(xml.contains("<AmdmntInd>true</AmdmntInd>"));
    assert!(xml.contains(
        "<AmdmntInfDtls><OrgnlDbtrAgt><FinInstnId><Othr><Id>SMNDA</Id></Othr>\
         </FinInstnId></OrgnlDbtrAgt></AmdmntInfDtls>"
    ));
}

#[test]
fn swiss_document_uses_the_national_scheme_blocks() {
    let account = Account::new("Muster AG", "CH5800791123000889012")
        .with_creditor_identifier("CH13ZZZ00000012345");
    let mut message = DirectDebit::new(account).with_message_id("MSG-1");
    message.add_transaction(
        DirectDebitTransaction::builder(
            "Schuldner AG",
            "CH9300762011623852957",
            Decimal::new(15000, 2),
            Mandate::new("M-77", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()),
        )
        .reference("RF-2026-0042")
        .currency("CHF")
        .local_instrument(LocalInstrument::DdCor1)
        .remittance_information("Abo 2026")
        .build(),
    );
    let xml = message
        .to_xml_with(Dialect::Pain00800102Ch03, &compact())
        .unwrap();

    assert!(xml.contains(
        "xmlns=\"http://www.six-interbank-clearing.com/de/pain.008.001.02.ch.03.xsd\""
    ));
    assert!(xml.contains(
        "<PmtTpInf><SvcLvl><Prtry>CHDD</Prtry></SvcLvl>\
         <LclInstrm><Prtry>DDCOR1</Prtry></LclInstrm></PmtTpInf>"
    ));
    // Batch booking, per-batch counters, sequence type, charge bearer and
    // the mandate block all stay out; the group header still counts.
    assert!(!xml.contains("<BtchBookg>"));
    assert!(!xml.contains("<SeqTp>"));
    assert!(!xml.contains("<ChrgBr>"));
    assert!(!xml.contains("<MndtRltdInf>"));
    assert_eq!(xml.matches("<NbOfTxs>").count(), 1);
    assert_eq!(xml.matches("<CtrlSum>").count(), 1);
    // Both agents are fixed to the national clearing system member.
    assert_eq!(
        xml.matches("<FinInstnId><ClrSysMmbId><MmbId>09000</MmbId></ClrSysMmbId></FinInstnId>")
            .count(),
        2
    );
    assert!(xml.contains(
        "<CdtrSchmeId><Id><PrvtId><Othr><Id>CH13ZZZ00000012345</Id>\
         <SchmeNm><Prtry>CHDD</Prtry></SchmeNm></Othr></PrvtId></Id></CdtrSchmeId>"
    ));
    assert!(xml.contains("<RmtInf><Ustrd>Abo 2026</Ustrd></RmtInf>"));
}

#[test]
fn creditor_account_override_forms_its_own_batch() {
    let mut message = DirectDebit::new(creditor()).with_message_id("MSG-1");
    message.add_transaction(collection(Decimal::new(10000, 2)));
    let mut with_override = collection(Decimal::new(2500, 2));
    with_override.creditor_account = Some(
        Account::new("Inkasso AG", "DE89370400440532013000")
            .with_bic("DEUTDEFF")
            .with_creditor_identifier("DE98ZZZ1"),
    );
    message.add_transaction(with_override);
    let xml = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap();

    assert_eq!(xml.matches("<PmtInf>").count(), 2);
    // The second batch takes its creditor blocks from the override.
    assert!(xml.contains("<Cdtr><Nm>Inkasso AG</Nm></Cdtr>"));
    assert!(xml.contains("<CdtrAcct><Id><IBAN>DE89370400440532013000</IBAN></Id></CdtrAcct>"));
    assert!(xml.contains("<CdtrAgt><FinInstnId><BIC>DEUTDEFF</BIC></FinInstnId></CdtrAgt>"));
    assert!(xml.contains("<Id>DE98ZZZ1</Id>"));
    assert!(
        xml.find("<PmtInfId>MSG-1/2</PmtInfId>").unwrap()
            < xml.find("<Nm>Inkasso AG</Nm>").unwrap()
    );
}

#[test]
fn sequence_types_split_batches() {
    let mut first = collection(Decimal::new(1000, 2));
    first.sequence_type = SequenceType::First;
    let mut recurring = collection(Decimal::new(2000, 2));
    recurring.sequence_type = SequenceType::Recurring;
    let message = message_with(vec![first, recurring]);
    let xml = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap();

    assert_eq!(xml.matches("<PmtInf>").count(), 2);
    assert!(xml.contains("<SeqTp>FRST</SeqTp>"));
    assert!(xml.contains("<SeqTp>RCUR</SeqTp>"));
    assert!(xml.find("FRST").unwrap() < xml.find("RCUR").unwrap());
}

#[test]
fn debtor_postal_address_keeps_the_debit_field_order() {
    let mut transaction = collection(Decimal::new(1000, 2));
    transaction.postal_address = Some(PostalAddress {
        country: Some("DE".to_string()),
        street_name: Some("Mainzer Landstrasse".to_string()),
        building_number: Some("128".to_string()),
        postal_code: Some("60327".to_string()),
        town_name: Some("Frankfurt".to_string()),
        address_line_1: Some("Postfach 11".to_string()),
        address_line_2: Some("Hinterhaus".to_string()),
    });
    let message = message_with(vec![transaction]);
    let xml = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap();

    // Country first, no building number, free-form lines last.
    assert!(xml.contains(
        "<PstlAdr><Ctry>DE</Ctry><StrtNm>Mainzer Landstrasse</StrtNm><PstCd>60327</PstCd>\
         <TwnNm>Frankfurt</TwnNm><AdrLine>Postfach 11</AdrLine><AdrLine>Hinterhaus</AdrLine>\
         </PstlAdr>"
    ));
    assert!(!xml.contains("<BldgNb>"));
}

#[test]
fn mixed_scheme_codes_abort_serialization() {
    let mut other = collection(Decimal::new(2000, 2));
    other.local_instrument = LocalInstrument::B2b;
    let message = message_with(vec![collection(Decimal::new(1000, 2)), other]);
    let err = message
        .to_xml_with(Dialect::Pain00800102, &compact())
        .unwrap_err();
    assert!(err.to_string().contains("local_instrument"));
}

#[test]
fn cor1_needs_the_relaxed_schema() {
    let mut transaction = collection(Decimal::new(1000, 2));
    transaction.local_instrument = LocalInstrument::Cor1;
    let message = message_with(vec![transaction]);

    match message
        .to_xml_with(Dialect::Pain00800202, &compact())
        .unwrap_err()
    {
        Error::Incompatible { rejected, .. } => {
            assert_eq!(rejected.len(), 1);
            assert!(rejected[0].1.contains("COR1"));
        }
        other => panic!("expected incompatibility, got {other:?}"),
    }

    let xml = message
        .to_xml_with(Dialect::Pain00800302, &compact())
        .unwrap();
    assert!(xml.contains("<LclInstrm><Cd>COR1</Cd></LclInstrm>"));
}

#[test]
fn credit_transfer_dialects_are_rejected() {
    let message = message_with(vec![collection(Decimal::new(1000, 2))]);
    let err = message
        .to_xml_with(Dialect::Pain00100103, &compact())
        .unwrap_err();
    assert!(err.to_string().contains("credit transfers"));
}

#[test]
fn compatible_dialects_shrink_with_the_fields() {
    let message = message_with(vec![collection(Decimal::new(1000, 2))]);
    // BIC present, EUR, CORE: everything but the Swiss schema fits.
    assert_eq!(
        message.compatible_dialects(),
        vec![
            Dialect::Pain00800302,
            Dialect::Pain00800202,
            Dialect::Pain00800102,
        ]
    );
}
