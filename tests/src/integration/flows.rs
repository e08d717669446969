//! # Integration Test Flows
//!
//! Drives a DA signer node through several epochs using only the public
//! API:
//!
//! 1. **Onboarding**: bond stake, register a key pair, register for the next epoch
//! 2. **Rotation**: the block hook commits a quorum set at each epoch boundary
//! 3. **Queries**: quorums, rows and bitmap aggregation against the committed set
//! 4. **Replication**: two nodes fed the same transactions agree byte for byte
//! 5. **Genesis**: an exported state restarts a node with identical answers

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_tracing, TestNetwork, TestOperator};
    use qc_18_da_signers::domain::bn254::{aggregate_g1, serialize_g1};
    use qc_18_da_signers::{
        Account, DaSignersApi, DaSignersError, DaSignersEvent, GenesisState, MsgChangeParams,
        MsgUpdateSocket, Params, TxContext,
    };
    use std::collections::{BTreeMap, BTreeSet};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const VOTES: [u64; 6] = [3, 7, 11, 13, 20, 30];

    fn flow_params() -> Params {
        Params {
            tokens_per_vote: 10,
            max_votes_per_signer: 1024,
            max_quorums: 4,
            epoch_blocks: 10,
            encoded_slices: 16,
        }
    }

    fn operators() -> Vec<TestOperator> {
        (0..VOTES.len() as u32).map(TestOperator::new).collect()
    }

    /// Network with every operator onboarded and epoch 1 committed.
    fn network_at_epoch_one() -> (TestNetwork, Vec<TestOperator>) {
        init_tracing();
        let mut net = TestNetwork::new(flow_params()).unwrap();
        let ops = operators();
        for (op, votes) in ops.iter().zip(VOTES) {
            net.onboard(op, votes).unwrap();
        }
        assert_eq!(net.advance_to(10).unwrap(), vec![1]);
        (net, ops)
    }

    fn keypairs_by_account(ops: &[TestOperator]) -> BTreeMap<Account, &TestOperator> {
        ops.iter().map(|op| (op.account, op)).collect()
    }

    // =============================================================================
    // ONBOARDING AND ROTATION
    // =============================================================================

    #[test]
    fn test_full_epoch_flow() {
        let (net, ops) = network_at_epoch_one();
        let params = flow_params();
        let total_votes: u64 = VOTES.iter().sum();

        assert_eq!(net.node.epoch_number().unwrap(), 1);
        // ceil(84 / 16) = 6, capped at 4
        assert_eq!(net.node.quorum_count(1).unwrap(), 4);

        let total_rows = 4 * params.encoded_slices;
        let mut rows: BTreeMap<Account, u64> = BTreeMap::new();
        for quorum_id in 0..4 {
            let quorum = net.node.quorum(1, quorum_id).unwrap();
            assert_eq!(quorum.signers.len() as u64, params.encoded_slices);
            for (row, account) in quorum.signers.iter().enumerate() {
                assert_eq!(
                    net.node.quorum_row(1, quorum_id, row as u64).unwrap(),
                    *account
                );
                *rows.entry(*account).or_default() += 1;
            }
        }

        // Every operator gets the floor or ceiling of its exact share.
        assert_eq!(rows.values().sum::<u64>(), total_rows);
        for (op, votes) in ops.iter().zip(VOTES) {
            let held = rows.get(&op.account).copied().unwrap_or_default();
            let exact_scaled = votes * total_rows;
            assert!(
                held * total_votes + total_votes > exact_scaled
                    && held * total_votes < exact_scaled + total_votes,
                "{} holds {} rows for {} votes",
                op.account,
                held,
                votes
            );
        }

        let rotations: Vec<_> = net
            .events
            .get_events()
            .into_iter()
            .filter(|e| e.name() == "new_epoch")
            .collect();
        assert_eq!(
            rotations,
            vec![DaSignersEvent::EpochRotated {
                epoch: 1,
                quorum_count: 4,
                block_height: 10,
            }]
        );
    }

    #[test]
    fn test_only_reregistered_operators_serve_next_epoch() {
        let (mut net, ops) = network_at_epoch_one();

        // Operators 0..3 stay available; 3..6 go quiet.
        for op in &ops[..3] {
            net.register_next(op).unwrap();
        }
        assert!(net.node.registered_epoch(&ops[0].account, 2).unwrap());
        assert!(!net.node.registered_epoch(&ops[4].account, 2).unwrap());

        assert_eq!(net.advance_to(20).unwrap(), vec![2]);

        // 3 + 7 + 11 = 21 ballots, two 16-row quorums.
        assert_eq!(net.node.quorum_count(2).unwrap(), 2);
        let serving: BTreeSet<Account> = (0..2)
            .flat_map(|q| net.node.quorum(2, q).unwrap().signers)
            .collect();
        let expected: BTreeSet<Account> = ops[..3].iter().map(|op| op.account).collect();
        assert_eq!(serving, expected);

        // Epoch 1 assignment is untouched.
        assert_eq!(net.node.quorum_count(1).unwrap(), 4);
    }

    #[test]
    fn test_unbonded_operator_is_skipped_at_rotation() {
        let (mut net, ops) = network_at_epoch_one();
        for op in &ops {
            net.register_next(op).unwrap();
        }
        net.stake.unbond_all(&ops[5].account);

        net.advance_to(20).unwrap();
        let quorum_count = net.node.quorum_count(2).unwrap();
        for q in 0..quorum_count {
            let quorum = net.node.quorum(2, q).unwrap();
            assert_eq!(quorum.rows_of(&ops[5].account), 0);
        }
        // Still a registered signer with a signed registration on record.
        assert!(net.node.is_signer(&ops[5].account).unwrap());
        assert!(net.node.registered_epoch(&ops[5].account, 2).unwrap());
    }

    #[test]
    fn test_epoch_without_registrations_commits_empty_set() {
        let (mut net, _ops) = network_at_epoch_one();
        assert_eq!(net.advance_to(20).unwrap(), vec![2]);
        assert_eq!(net.node.quorum_count(2).unwrap(), 0);
        assert!(matches!(
            net.node.quorum(2, 0),
            Err(DaSignersError::QuorumIdOutOfBound { .. })
        ));
    }

    // =============================================================================
    // AGGREGATION
    // =============================================================================

    #[test]
    fn test_aggregate_full_and_partial_bitmaps() {
        let (net, ops) = network_at_epoch_one();
        let by_account = keypairs_by_account(&ops);
        let quorum = net.node.quorum(1, 0).unwrap();

        let full = net.node.aggregate_pubkey_g1(1, 0, &[0xff, 0xff]).unwrap();
        assert_eq!(full.total, 16);
        assert_eq!(full.hit, 16);
        let distinct: BTreeSet<Account> = quorum.signers.iter().copied().collect();
        let keys: Vec<_> = distinct
            .iter()
            .map(|a| by_account[a].keypair.pubkey_g1)
            .collect();
        assert_eq!(full.aggregate_pubkey_g1, serialize_g1(&aggregate_g1(keys.iter())));

        // Only row 0 attests: its operator counts with all of its rows.
        let first = quorum.signers[0];
        let partial = net.node.aggregate_pubkey_g1(1, 0, &[0x01, 0x00]).unwrap();
        assert_eq!(partial.hit as usize, quorum.rows_of(&first));
        assert_eq!(
            partial.aggregate_pubkey_g1,
            by_account[&first].keypair.pubkey_g1_bytes()
        );

        let none = net.node.aggregate_pubkey_g1(1, 0, &[0x00, 0x00]).unwrap();
        assert_eq!(none.hit, 0);
        assert_eq!(none.aggregate_pubkey_g1, [0u8; 64]);
    }

    #[test]
    fn test_aggregate_rejects_wrong_bitmap_length() {
        let (net, _ops) = network_at_epoch_one();
        assert!(matches!(
            net.node.aggregate_pubkey_g1(1, 0, &[0xff]),
            Err(DaSignersError::QuorumBitmapLengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            net.node.aggregate_pubkey_g1(1, 9, &[0xff, 0xff]),
            Err(DaSignersError::QuorumIdOutOfBound { .. })
        ));
        assert!(matches!(
            net.node.aggregate_pubkey_g1(7, 0, &[0xff, 0xff]),
            Err(DaSignersError::EpochNotFound { epoch: 7 })
        ));
    }

    // =============================================================================
    // GOVERNANCE AND SOCKETS
    // =============================================================================

    #[test]
    fn test_governance_params_apply_at_next_rotation() {
        let (mut net, ops) = network_at_epoch_one();
        for op in &ops {
            net.register_next(op).unwrap();
        }

        let params = Params {
            encoded_slices: 8,
            ..flow_params()
        };
        let outsider = TxContext::new(12, ops[0].account.to_string());
        assert!(matches!(
            net.node.change_params(
                &outsider,
                MsgChangeParams {
                    authority: ops[0].account.to_string(),
                    params: params.clone(),
                }
            ),
            Err(DaSignersError::Unauthorized { .. })
        ));

        net.node
            .change_params(
                &TxContext::new(12, "gov"),
                MsgChangeParams {
                    authority: "gov".into(),
                    params: params.clone(),
                },
            )
            .unwrap();
        assert_eq!(net.node.params().unwrap(), params);

        net.advance_to(20).unwrap();
        assert_eq!(net.node.quorum_count(2).unwrap(), 4);
        assert_eq!(net.node.quorum(2, 0).unwrap().signers.len(), 8);
        assert!(matches!(
            net.node.aggregate_pubkey_g1(2, 0, &[0xff, 0xff]),
            Err(DaSignersError::QuorumBitmapLengthMismatch { expected: 1, .. })
        ));
        // Epoch 1 quorums keep their own width.
        assert!(net.node.aggregate_pubkey_g1(1, 0, &[0xff, 0xff]).is_ok());
    }

    #[test]
    fn test_socket_update_visible_in_batch_lookup() {
        let (mut net, ops) = network_at_epoch_one();
        net.node
            .update_socket(
                &ops[2].ctx(11),
                MsgUpdateSocket {
                    account: ops[2].account.to_string(),
                    socket: "moved.example:9000".into(),
                },
            )
            .unwrap();

        let accounts = [ops[2].account, ops[0].account];
        let signers = net.node.get_signers(&accounts).unwrap();
        assert_eq!(signers[0].socket, "moved.example:9000");
        assert_eq!(signers[1], ops[0].signer());
    }

    // =============================================================================
    // REPLICATION AND GENESIS
    // =============================================================================

    #[test]
    fn test_replicas_agree_on_assignment() {
        let (a, _) = network_at_epoch_one();
        let (b, _) = network_at_epoch_one();
        for quorum_id in 0..4 {
            assert_eq!(
                a.node.quorum(1, quorum_id).unwrap(),
                b.node.quorum(1, quorum_id).unwrap()
            );
        }
        assert_eq!(a.node.export_genesis().unwrap(), b.node.export_genesis().unwrap());
    }

    #[test]
    fn test_exported_genesis_restarts_node() {
        let (net, ops) = network_at_epoch_one();
        let exported = net.node.export_genesis().unwrap();
        assert_eq!(exported.epoch_number, 1);
        assert_eq!(exported.quorums_by_epoch.len(), 2);
        assert_eq!(exported.signers.len(), ops.len());

        let json = serde_json::to_string_pretty(&exported).unwrap();
        let parsed: GenesisState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, exported);

        let mut restarted = TestNetwork::new(flow_params()).unwrap();
        restarted.node.init_genesis(&parsed).unwrap();
        assert_eq!(restarted.node.epoch_number().unwrap(), 1);
        assert_eq!(
            restarted.node.quorum(1, 3).unwrap(),
            net.node.quorum(1, 3).unwrap()
        );
        assert_eq!(
            restarted.node.aggregate_pubkey_g1(1, 2, &[0xff, 0xff]).unwrap(),
            net.node.aggregate_pubkey_g1(1, 2, &[0xff, 0xff]).unwrap()
        );
        assert_eq!(restarted.node.export_genesis().unwrap(), exported);
    }
}
