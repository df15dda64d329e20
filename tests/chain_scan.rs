//! End-to-end scan of a chain fixture

use mailbox_watch::contract::ScriptBuilder;
use mailbox_watch::core::{Block, Transaction, TransactionKind};
use mailbox_watch::crypto::UInt160;
use mailbox_watch::mailbox::REGISTER_MAILBOX;
use mailbox_watch::monitor::{BlockMonitor, ChainFixture, MemoryChain, MonitorConfig};
use std::io::Write;
use std::time::Duration;

const BYTECODE: &[u8] = &[0x00, 0x52, 0xc5, 0x6b, 0x61, 0x6c, 0x75, 0x66];

fn register(contract: &UInt160, owner: u8, name: &str) -> Transaction {
    let mut builder = ScriptBuilder::new();
    builder.invoke(
        contract,
        REGISTER_MAILBOX,
        &[vec![owner; 20], name.as_bytes().to_vec()],
    );
    Transaction::invocation(builder.build())
}

fn fixture() -> (ChainFixture, Transaction) {
    let mut deploy = ScriptBuilder::new();
    deploy.deploy(BYTECODE, "Mailbox");
    let deployment = Transaction::invocation(deploy.build());
    let contract = UInt160::from_script(BYTECODE);

    let mut other_call = ScriptBuilder::new();
    other_call.invoke(
        &UInt160::new([0x42; 20]),
        REGISTER_MAILBOX,
        &[vec![9; 20], b"decoy_box".to_vec()],
    );

    let blocks = vec![
        Block::new(
            0,
            String::new(),
            vec![Transaction::new(TransactionKind::Miner, vec![])],
        ),
        Block::new(1, String::new(), vec![deployment.clone()]),
        Block::new(
            2,
            String::new(),
            vec![
                register(&contract, 1, "alice_box"),
                Transaction::invocation(other_call.build()),
                Transaction::invocation(vec![0x4c]),
            ],
        ),
        Block::new(
            3,
            String::new(),
            vec![
                register(&contract, 2, "alice_box"),
                register(&contract, 2, "bob_box"),
                register(&contract, 1, "carol_box"),
            ],
        ),
    ];

    (ChainFixture { blocks }, deployment)
}

#[tokio::test]
async fn test_scan_fixture_file() {
    let (fixture, deployment) = fixture();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&fixture).unwrap().as_bytes())
        .unwrap();

    let chain = MemoryChain::load(file.path()).unwrap();
    let config = MonitorConfig {
        poll_interval: Duration::from_millis(10),
        ..Default::default()
    };
    let mut monitor = BlockMonitor::connect(chain, &deployment.hash, config)
        .await
        .unwrap();

    assert_eq!(monitor.poll_once().await.unwrap(), 3);
    assert_eq!(monitor.last_processed_height(), 3);

    let registry = monitor.registry();
    assert_eq!(registry.count(), 2);
    assert_eq!(
        registry.get_by_name("alice_box").unwrap().address,
        UInt160::new([1; 20])
    );
    assert_eq!(
        registry.get_by_address(&UInt160::new([2; 20])).unwrap().name,
        "bob_box"
    );
    assert!(registry.get_by_name("decoy_box").is_none());
    assert!(registry.get_by_name("carol_box").is_none());

    let stats = monitor.stats();
    assert_eq!(stats.blocks_processed, 3);
    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.registrations, 4);
    assert_eq!(stats.registrations_accepted, 2);
}

#[tokio::test]
async fn test_run_until_stopped() {
    let (fixture, deployment) = fixture();
    let chain = MemoryChain::from_blocks(fixture.blocks);
    let config = MonitorConfig {
        poll_interval: Duration::from_millis(10),
        ..Default::default()
    };
    let mut monitor = BlockMonitor::connect(chain, &deployment.hash, config)
        .await
        .unwrap();

    let control = monitor.control();
    let stopper = control.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        stopper.stop();
    });

    tokio::time::timeout(Duration::from_secs(5), monitor.run())
        .await
        .expect("monitor did not stop")
        .unwrap();

    assert!(!control.is_running());
    assert_eq!(monitor.last_processed_height(), 3);
    assert_eq!(monitor.registry().count(), 2);
}
