//! File-backed ledger, audit trail and bootstrap wiring

mod common;

use common::caller;
use log_registry::audit::{verify_audit_trail_file, AuditTrail};
use log_registry::config::loader;
use log_registry::contract::BOOTSTRAP_KEY;
use log_registry::integrity::content_digest;
use log_registry::ledger::FileLedger;
use log_registry::{ErrorKind, LogContract};
use tempfile::tempdir;

#[test]
fn test_records_survive_reopen() {
    let temp_dir = tempdir().unwrap();
    let ledger_path = temp_dir.path().join("ledger.jsonl");

    {
        let contract = LogContract::new(
            FileLedger::open(&ledger_path).unwrap(),
            log_registry::authorization::AuthorizationEngine::per_record(),
        );
        contract.upload_log(&caller("OrgA"), "f1", b"abc").unwrap();
        contract.upload_log(&caller("OrgA"), "f1", b"abcd").unwrap();
    }

    let contract = LogContract::new(
        FileLedger::open(&ledger_path).unwrap(),
        log_registry::authorization::AuthorizationEngine::per_record(),
    );
    let record = contract.read_log(&caller("OrgA"), "f1").unwrap();
    assert_eq!(record.content(), Some(&b"abcd"[..]));
    assert_eq!(
        contract.read_log(&caller("OrgB"), "f1").unwrap_err().kind(),
        ErrorKind::Unauthorized
    );
}

#[test]
fn test_configured_registry_end_to_end() {
    let temp_dir = tempdir().unwrap();
    let bootstrap = temp_dir.path().join("data.csv");
    std::fs::write(&bootstrap, "id,message\n1,boot\n").unwrap();

    let config_path = temp_dir.path().join("registry.yml");
    std::fs::write(
        &config_path,
        format!(
            "server_id: registry-e2e\npolicy:\n  mode: global\n  allow_list: [Atlas, Spot]\nledger_path: {}\nbootstrap_path: {}\naudit:\n  enabled: true\n  log_path: {}\n",
            temp_dir.path().join("ledger.jsonl").display(),
            bootstrap.display(),
            temp_dir.path().join("audit.jsonl").display(),
        ),
    )
    .unwrap();

    let config = loader::load_from_file(&config_path).unwrap();
    let contract = LogContract::new(
        FileLedger::open(&config.ledger_path).unwrap(),
        config.authorization_engine().unwrap(),
    )
    .with_bootstrap(config.bootstrap_source())
    .with_audit_trail(AuditTrail::open(&config.audit.log_path, &config.server_id).unwrap());

    contract.init_ledger(&caller("Atlas")).unwrap();
    let seed = contract.read_log(&caller("Spot"), BOOTSTRAP_KEY).unwrap();
    assert_eq!(seed.content(), Some(&b"id,message\n1,boot\n"[..]));
    assert_eq!(seed.content_digest, content_digest(b"id,message\n1,boot\n"));

    assert_eq!(
        contract.read_log(&caller("Mallory"), BOOTSTRAP_KEY).unwrap_err().kind(),
        ErrorKind::Unauthorized
    );

    let summary = verify_audit_trail_file(&config.audit.log_path).unwrap();
    assert_eq!(summary.entry_count, 4);
    assert_eq!(summary.committed, 2);
    assert_eq!(summary.rejected, 1);
}

#[test]
fn test_init_ledger_without_bootstrap_file() {
    let temp_dir = tempdir().unwrap();
    let ledger = FileLedger::open(temp_dir.path().join("ledger.jsonl")).unwrap();
    let contract = LogContract::new(
        ledger,
        log_registry::authorization::AuthorizationEngine::per_record(),
    )
    .with_bootstrap(log_registry::contract::BootstrapSource::File(
        temp_dir.path().join("data.csv"),
    ));

    let err = contract.init_ledger(&caller("OrgA")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    // Other operations are unaffected.
    contract.upload_log(&caller("OrgA"), "f1", b"abc").unwrap();
    assert_eq!(
        contract.read_log(&caller("OrgA"), BOOTSTRAP_KEY).unwrap_err().kind(),
        ErrorKind::Unauthorized
    );
}
