use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    pubsub_client::PubsubClient,
    rpc_client::RpcClient,
    rpc_config::{
        RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSignatureSubscribeConfig,
        RpcSimulateTransactionConfig,
    },
    rpc_filter::{Memcmp, RpcFilterType},
    rpc_request::RpcRequest,
    rpc_response::{Response, RpcKeyedAccount, RpcSignatureResult},
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use serde_json::json;
use tracing::debug;

use super::{AccountFilter, Ledger, Simulation};

/// [`Ledger`] backed by a JSON-RPC endpoint, with optional websocket confirmation.
pub struct RpcLedger {
    client: RpcClient,
    ws_url: Option<String>,
    confirm_timeout: Duration,
}

impl RpcLedger {
    pub fn new(rpc_url: &str, ws_url: Option<String>, confirm_timeout: Duration) -> Self {
        Self {
            client: RpcClient::new_with_commitment(
                rpc_url.to_string(),
                CommitmentConfig::confirmed(),
            ),
            ws_url,
            confirm_timeout,
        }
    }

    fn send_and_confirm_with_subscription(
        &self,
        ws_url: &str,
        transaction: &Transaction,
    ) -> Result<Signature> {
        let signature = transaction.signatures[0];

        // subscribe first so the notification cannot be missed
        let (mut subscription, receiver) = PubsubClient::signature_subscribe(
            ws_url,
            &signature,
            Some(RpcSignatureSubscribeConfig {
                commitment: Some(self.client.commitment()),
                enable_received_notification: Some(false),
            }),
        )
        .with_context(|| format!("failed to subscribe to {ws_url}"))?;

        self.client
            .send_transaction(transaction)
            .context("failed to send transaction")?;
        debug!(%signature, "transaction sent, waiting for confirmation");

        let response = receiver
            .recv_timeout(self.confirm_timeout)
            .with_context(|| format!("no confirmation for {signature}"));
        if subscription.shutdown().is_err() {
            debug!(%signature, "signature subscription did not shut down cleanly");
        }

        if let RpcSignatureResult::ProcessedSignature(result) = response?.value {
            if let Some(err) = result.err {
                bail!(
                    "transaction {signature} failed: {}",
                    TransactionError::from(err)
                );
            }
        }

        Ok(signature)
    }
}

fn to_rpc_filter(filter: &AccountFilter) -> RpcFilterType {
    match filter {
        AccountFilter::DataSize(size) => RpcFilterType::DataSize(*size),
        AccountFilter::Memcmp { offset, bytes } => {
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(*offset, bytes.clone()))
        }
    }
}

impl Ledger for RpcLedger {
    fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.client.get_balance(address)?)
    }

    fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        Ok(self
            .client
            .get_account_with_commitment(address, self.client.commitment())?
            .value)
    }

    fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        Ok(self.client.get_multiple_accounts(addresses)?)
    }

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(filters.iter().map(to_rpc_filter).collect()),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.client.commitment()),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        Ok(self
            .client
            .get_program_accounts_with_config(program_id, config)?)
    }

    fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>> {
        let response: Response<Vec<RpcKeyedAccount>> = self.client.send(
            RpcRequest::GetTokenAccountsByOwner,
            json!([
                owner.to_string(),
                { "programId": token_program.to_string() },
                {
                    "encoding": UiAccountEncoding::Base64,
                    "commitment": self.client.commitment().commitment,
                },
            ]),
        )?;

        response
            .value
            .into_iter()
            .map(|keyed| {
                let address: Pubkey = keyed
                    .pubkey
                    .parse()
                    .with_context(|| format!("invalid token account address {}", keyed.pubkey))?;
                let account = keyed
                    .account
                    .decode::<Account>()
                    .ok_or_else(|| anyhow!("cannot decode token account {address}"))?;
                Ok((address, account))
            })
            .collect()
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok(self.client.get_minimum_balance_for_rent_exemption(data_len)?)
    }

    fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.client.get_latest_blockhash()?)
    }

    fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature> {
        let signature = self.client.request_airdrop(address, lamports)?;
        self.client
            .poll_for_signature_with_commitment(&signature, self.client.commitment())
            .with_context(|| format!("airdrop {signature} was not confirmed"))?;
        Ok(signature)
    }

    fn simulate_transaction(&self, transaction: &Transaction) -> Result<Simulation> {
        let response = self.client.simulate_transaction_with_config(
            transaction,
            RpcSimulateTransactionConfig {
                sig_verify: false,
                replace_recent_blockhash: true,
                commitment: Some(self.client.commitment()),
                ..RpcSimulateTransactionConfig::default()
            },
        )?;

        Ok(Simulation {
            units_consumed: response.value.units_consumed,
            logs: response.value.logs.unwrap_or_default(),
            err: response.value.err.map(TransactionError::from),
        })
    }

    fn recent_prioritization_fees(&self, writable_accounts: &[Pubkey]) -> Result<Vec<u64>> {
        Ok(self
            .client
            .get_recent_prioritization_fees(writable_accounts)?
            .into_iter()
            .map(|fee| fee.prioritization_fee)
            .collect())
    }

    fn send_and_confirm_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        match &self.ws_url {
            Some(ws_url) => self.send_and_confirm_with_subscription(ws_url, transaction),
            None => Ok(self.client.send_and_confirm_transaction(transaction)?),
        }
    }
}
