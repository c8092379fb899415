//! End-to-end fixture chain: reward, block, spend, block

use ledger_fixture::address::{AddressDataProvider, AddressDelegate, KeyPairAddressProvider};
use ledger_fixture::core::{
    equivalent, BlockchainView, NewOutput, OutPoint, OutputSetError, Spend, Transaction,
    TransactionError, TransactionInput, TransactionOutput,
};
use ledger_fixture::events::EventRecorder;
use ledger_fixture::sample::{ChainSampleData, ChainSampleError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn reward_then_spend_across_two_blocks() {
    init_logging();

    let addresses = AddressDelegate::new(KeyPairAddressProvider::default());
    let owner_a = addresses.internal_address_data().ownership();
    let owner_b = addresses.receiving_address_of("SENDER").unwrap().ownership();
    let owner_c = addresses.receiving_address_of("RECEIVER").unwrap().ownership();

    let recorder = EventRecorder::new();
    let mut chain = ChainSampleData::default();
    chain.add_listener(Box::new(recorder.clone()));

    let genesis = chain.best_block_height();
    assert!(chain.available_outputs().is_empty());

    // Block 1: the reward alone
    let reward = chain.generation_transaction("R", owner_a.clone()).unwrap();
    let block1 = chain.new_block_with(&reward).unwrap();
    assert_eq!(chain.best_block_height(), genesis + 1);

    let reward_outpoint = OutPoint::new(reward.hash(), 0);
    let available: Vec<OutPoint> = chain
        .available_outputs()
        .available()
        .map(|(p, _)| *p)
        .collect();
    assert_eq!(available, vec![reward_outpoint]);
    assert_eq!(chain.available_outputs().balance_of(&owner_a), 50);

    // Block 2: spend the reward into two outputs
    let spend = chain
        .normal_transaction(
            "T",
            &[Spend::new(reward_outpoint)],
            &[
                NewOutput::new(20, owner_b.clone()),
                NewOutput::new(30, owner_c.clone()),
            ],
        )
        .unwrap();
    let block2 = chain.new_block_with(&spend).unwrap();
    assert_eq!(chain.best_block_height(), genesis + 2);
    assert_eq!(block2.header().previous_hash, block1.hash());

    let outputs = chain.available_outputs();
    assert_eq!(outputs.len(), 2);
    assert!(!outputs.contains(&reward_outpoint));
    assert_eq!(outputs.get(&OutPoint::new(spend.hash(), 0)).unwrap().amount, 20);
    assert_eq!(outputs.get(&OutPoint::new(spend.hash(), 1)).unwrap().amount, 30);
    assert_eq!(outputs.balance_of(&owner_b), 20);
    assert_eq!(outputs.balance_of(&owner_c), 30);

    // Two block-scoped notifications (R then T, each first in its block)
    // out of four in total, since each transaction is also announced when built
    let in_block = recorder.block_events();
    assert_eq!(in_block.len(), 2);
    assert_eq!(recorder.len(), 4);
    assert_eq!(in_block[0].tx_hash, reward.hash());
    assert_eq!(in_block[0].block_height, Some(genesis + 1));
    assert_eq!(in_block[0].block_hash, Some(block1.hash()));
    assert_eq!(in_block[0].tx_index, Some(0));
    assert_eq!(in_block[1].tx_hash, spend.hash());
    assert_eq!(in_block[1].block_height, Some(genesis + 2));
    assert_eq!(in_block[1].block_hash, Some(block2.hash()));
    assert_eq!(in_block[1].tx_index, Some(0));

    // Each transaction was also announced once when it was built
    let all: Vec<_> = recorder
        .events()
        .iter()
        .map(|e| (e.tx_hash, e.in_block()))
        .collect();
    assert_eq!(
        all,
        vec![
            (reward.hash(), false),
            (reward.hash(), true),
            (spend.hash(), false),
            (spend.hash(), true),
        ]
    );

    // The chain view resolves both transactions and blocks
    let view = chain.chain();
    assert_eq!(view.transaction(&spend.hash()), Some(&spend.transaction));
    assert_eq!(view.block_at(genesis + 1).unwrap().block, block1);
    assert_eq!(view.block_by_hash(&block2.hash()).unwrap().height, genesis + 2);
}

#[test]
fn spent_output_cannot_be_spent_again() {
    init_logging();

    let mut chain = ChainSampleData::default();
    let addresses = KeyPairAddressProvider::default();
    let owner = addresses.receiving_address_of("IMPORTER").unwrap().ownership();

    let reward = chain.generation_transaction("R", owner.clone()).unwrap();
    let outpoint = OutPoint::new(reward.hash(), 0);
    chain.normal_transaction("burn", &[Spend::new(outpoint)], &[]).unwrap();

    assert!(chain.available_outputs().available().all(|(p, _)| *p != outpoint));
    assert_eq!(
        chain
            .normal_transaction("again", &[Spend::new(outpoint)], &[NewOutput::new(1, owner)])
            .unwrap_err(),
        ChainSampleError::Transaction(TransactionError::OutputSet(
            OutputSetError::UnknownOutput(outpoint)
        ))
    );
}

#[test]
fn built_transaction_matches_expected_shape() {
    let mut chain = ChainSampleData::default();
    let addresses = KeyPairAddressProvider::default();
    let sender = addresses.receiving_address_of("SENDER").unwrap().ownership();
    let receiver = addresses.receiving_address_of("RECEIVER").unwrap().ownership();

    let reward = chain.generation_transaction("R", sender.clone()).unwrap();
    let funding = reward.output(0).unwrap();
    let actual = chain
        .normal_transaction(
            "pay",
            &[Spend::from(&funding)],
            &[
                NewOutput::new(40, receiver.clone()),
                NewOutput::new(10, sender.clone()),
            ],
        )
        .unwrap()
        .transaction;

    let expected = Transaction::new(
        actual.version(),
        vec![TransactionInput {
            outpoint: funding.outpoint,
            unlocking_script: Vec::new(),
            sequence: 0,
        }],
        vec![
            TransactionOutput::new(40, receiver.clone()),
            TransactionOutput::new(10, sender.clone()),
        ],
        0,
    );
    assert!(equivalent(&actual, &actual));
    assert!(equivalent(&actual, &expected));

    let wrong_change = Transaction::new(
        actual.version(),
        expected.inputs().to_vec(),
        vec![
            TransactionOutput::new(40, receiver),
            TransactionOutput::new(11, sender),
        ],
        0,
    );
    assert!(!equivalent(&actual, &wrong_change));
}
