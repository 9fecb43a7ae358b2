//! Known-answer/"it signs and verifies" integration tests: the positive
//! end-to-end scenarios, driven through the public API the same way an
//! external caller would use it (split a file, build a CFF over its blocks,
//! sign, mutate some blocks, verify), plus the serialisation and block-
//! concatenation invariants. Tamper/rejection scenarios live in `neg.rs`.

use anyhow::bail;
use mtss_core::blocks::{self, FileType, SplitStrategy};
use mtss_core::cff::{self, CffMethod, MatrixType};
use mtss_core::hash::HashId;
use mtss_core::signature::{keygen, CdssId};
use mtss_core::{sign, verify, Decoder, MtssSignature, SignParams, VerifyOutcome, VerifyParams};

fn four_line_file() -> Vec<u8> {
    b"line one\nline two\nline three\nline four\n".to_vec()
}

#[test]
fn scenario_1_sperner_locates_single_modified_block() -> anyhow::Result<()> {
    let message = four_line_file();
    let blocked = blocks::split(&message, FileType::Text, SplitStrategy::FixedCount(4))?;
    assert_eq!(blocked.n(), 4);

    let cff = cff::build(CffMethod::Sperner, 1, blocked.n(), MatrixType::List)?;
    assert_eq!(cff.t, 4);

    let kp = keygen(CdssId::Ecdsa)?;
    let signed = sign(
        &SignParams { blocked: &blocked, cff: &cff, hash: HashId::Sha2256, cdss: CdssId::Ecdsa, sk: &kp.sk },
        FileType::Text,
    )?;

    let mut modified = blocked.clone();
    modified.blocks[2] = b"LINE THREE, MODIFIED\n".to_vec();

    let outcome = verify(
        &VerifyParams { blocked: &modified, cff: &cff, decoder: Decoder::Specific, pk: &kp.pk },
        &signed,
    )?;
    match outcome {
        VerifyOutcome::Changed { found: true, modified: i } => assert_eq!(i, vec![3]),
        other => bail!("expected Changed{{found:true, modified:[3]}}, got {other:?}"),
    }
    Ok(())
}

#[test]
fn scenario_2_sts_locates_two_modified_blocks() -> anyhow::Result<()> {
    let message: Vec<u8> = (1..=7).map(|i| format!("line {i}\n")).collect::<String>().into_bytes();
    let blocked = blocks::split(&message, FileType::Text, SplitStrategy::FixedCount(7))?;
    assert_eq!(blocked.n(), 7);

    let cff = cff::build(CffMethod::Sts, 2, blocked.n(), MatrixType::List)?;

    let kp = keygen(CdssId::Ecdsa)?;
    let signed = sign(
        &SignParams { blocked: &blocked, cff: &cff, hash: HashId::Sha2256, cdss: CdssId::Ecdsa, sk: &kp.sk },
        FileType::Text,
    )?;

    let mut modified = blocked.clone();
    modified.blocks[0] = b"MODIFIED FIRST\n".to_vec();
    modified.blocks[3] = b"MODIFIED FOURTH\n".to_vec();

    let outcome = verify(
        &VerifyParams { blocked: &modified, cff: &cff, decoder: Decoder::Specific, pk: &kp.pk },
        &signed,
    )?;
    match outcome {
        VerifyOutcome::Changed { found: true, modified: i } => {
            assert_eq!(i.len(), 2);
            assert!(i.contains(&1));
            assert!(i.contains(&4));
        }
        other => bail!("expected Changed{{found:true, modified:[1,4]}}, got {other:?}"),
    }
    Ok(())
}

#[test]
fn scenario_3_rs_d2_n100_locates_two_modified_blocks() -> anyhow::Result<()> {
    let message: Vec<u8> = (1..=100).map(|i| format!("line {i}\n")).collect::<String>().into_bytes();
    let blocked = blocks::split(&message, FileType::Text, SplitStrategy::FixedCount(100))?;
    assert_eq!(blocked.n(), 100);

    let cff = cff::build(CffMethod::Rs, 2, blocked.n(), MatrixType::List)?;

    let kp = keygen(CdssId::Ecdsa)?;
    let signed = sign(
        &SignParams { blocked: &blocked, cff: &cff, hash: HashId::Sha2256, cdss: CdssId::Ecdsa, sk: &kp.sk },
        FileType::Text,
    )?;

    let mut modified = blocked.clone();
    modified.blocks[4] = b"MODIFIED BLOCK FIVE\n".to_vec();
    modified.blocks[49] = b"MODIFIED BLOCK FIFTY\n".to_vec();

    let outcome = verify(
        &VerifyParams { blocked: &modified, cff: &cff, decoder: Decoder::Specific, pk: &kp.pk },
        &signed,
    )?;
    match outcome {
        VerifyOutcome::Changed { found: true, modified: i } => {
            assert!(i.contains(&5));
            assert!(i.contains(&50));
        }
        other => bail!("expected Changed{{found:true}} containing 5 and 50, got {other:?}"),
    }
    Ok(())
}

#[test]
fn scenario_4_rs_d3_n50_locates_three_modified_blocks() -> anyhow::Result<()> {
    let message: Vec<u8> = (1..=50).map(|i| format!("line {i}\n")).collect::<String>().into_bytes();
    let blocked = blocks::split(&message, FileType::Text, SplitStrategy::FixedCount(50))?;
    assert_eq!(blocked.n(), 50);

    let cff = cff::build(CffMethod::Rs, 3, blocked.n(), MatrixType::List)?;

    let kp = keygen(CdssId::Ecdsa)?;
    let signed = sign(
        &SignParams { blocked: &blocked, cff: &cff, hash: HashId::Sha2256, cdss: CdssId::Ecdsa, sk: &kp.sk },
        FileType::Text,
    )?;

    let mut modified = blocked.clone();
    modified.blocks[3] = b"MODIFIED A\n".to_vec();
    modified.blocks[20] = b"MODIFIED B\n".to_vec();
    modified.blocks[44] = b"MODIFIED C\n".to_vec();

    let outcome = verify(
        &VerifyParams { blocked: &modified, cff: &cff, decoder: Decoder::Specific, pk: &kp.pk },
        &signed,
    )?;
    match outcome {
        VerifyOutcome::Changed { found: true, modified: i } => {
            assert_eq!(i.len(), 3);
            for expected in [4usize, 21, 45] {
                assert!(i.contains(&expected), "expected {expected} in {i:?}");
            }
        }
        other => bail!("expected Changed{{found:true}} with exactly 3 indices, got {other:?}"),
    }
    Ok(())
}

#[test]
fn scenario_5_unchanged_message_short_circuits_before_decoding() -> anyhow::Result<()> {
    let message = four_line_file();
    let blocked = blocks::split(&message, FileType::Text, SplitStrategy::FixedCount(4))?;
    let cff = cff::build(CffMethod::Sperner, 1, blocked.n(), MatrixType::List)?;

    let kp = keygen(CdssId::Ecdsa)?;
    let signed = sign(
        &SignParams { blocked: &blocked, cff: &cff, hash: HashId::Sha2256, cdss: CdssId::Ecdsa, sk: &kp.sk },
        FileType::Text,
    )?;

    let outcome = verify(
        &VerifyParams { blocked: &blocked, cff: &cff, decoder: Decoder::Specific, pk: &kp.pk },
        &signed,
    )?;
    assert_eq!(outcome, VerifyOutcome::Unchanged);
    Ok(())
}

#[test]
fn serialisation_idempotence() -> anyhow::Result<()> {
    let message = four_line_file();
    let blocked = blocks::split(&message, FileType::Text, SplitStrategy::FixedCount(4))?;
    let cff = cff::build(CffMethod::Sperner, 1, blocked.n(), MatrixType::List)?;
    let kp = keygen(CdssId::Ecdsa)?;
    let signed = sign(
        &SignParams { blocked: &blocked, cff: &cff, hash: HashId::Sha2256, cdss: CdssId::Ecdsa, sk: &kp.sk },
        FileType::Text,
    )?;

    let text = signed.write();
    let parsed = MtssSignature::read(&text)?;
    assert_eq!(parsed, signed);
    Ok(())
}

#[test]
fn block_concatenation_identity_for_text_files() -> anyhow::Result<()> {
    let message = four_line_file();
    for strategy in [SplitStrategy::FixedSize(1), SplitStrategy::FixedCount(2), SplitStrategy::FixedCount(3)] {
        let blocked = blocks::split(&message, FileType::Text, strategy)?;
        let rebuilt: Vec<u8> = blocked.blocks.iter().flatten().copied().collect();
        assert_eq!(rebuilt, message);
    }
    Ok(())
}
