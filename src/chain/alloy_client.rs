//! JSON-RPC chain client backed by alloy.
//!
//! One HTTP provider with the account's local signer attached. Every
//! transaction field (gas, gas price, nonce, chain id) is set by the
//! caller, so the provider's fillers only sign.

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::reqwest::Url;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::abi::IWETH;
use super::{ChainClient, PreparedTx, TxReceipt, WethCall};
use crate::config::{Account, NetworkConfig};

pub struct AlloyChainClient {
    provider: DynProvider,
    contract: Address,
    poll_interval: Duration,
}

impl AlloyChainClient {
    /// Build the provider and verify the endpoint answers with the
    /// configured chain id.
    pub async fn connect(
        network: &NetworkConfig,
        account: &Account,
        poll_interval: Duration,
    ) -> Result<Self> {
        let url: Url = network
            .rpc_url
            .parse()
            .with_context(|| format!("Invalid RPC URL: {}", network.rpc_url))?;
        let wallet = EthereumWallet::from(account.signer()?);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(url)
            .erased();

        let client = Self {
            provider,
            contract: network.contract()?,
            poll_interval,
        };

        let chain_id = client
            .chain_id()
            .await
            .with_context(|| format!("Failed to reach RPC endpoint {}", network.rpc_url))?;
        if chain_id != network.chain_id {
            bail!(
                "RPC endpoint {} serves chain {chain_id}, expected {}",
                network.rpc_url,
                network.chain_id
            );
        }

        info!(rpc = %network.rpc_url, chain_id, contract = %client.contract, "Connected to chain");
        Ok(client)
    }

    fn call_request(&self, from: Address, call: &WethCall) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.contract)
            .with_value(call.value())
            .with_input(call.calldata())
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("eth_chainId failed")
    }

    async fn native_balance(&self, owner: Address) -> Result<U256> {
        self.provider
            .get_balance(owner)
            .await
            .context("eth_getBalance failed")
    }

    async fn wrapped_balance(&self, owner: Address) -> Result<U256> {
        let weth = IWETH::new(self.contract, self.provider.clone());
        weth.balanceOf(owner)
            .call()
            .await
            .context("balanceOf call failed")
    }

    async fn estimate_gas(&self, from: Address, call: &WethCall) -> Result<u64> {
        let request = self.call_request(from, call);
        self.provider
            .estimate_gas(request)
            .await
            .context("eth_estimateGas failed")
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .context("eth_gasPrice failed")
    }

    async fn nonce(&self, owner: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(owner)
            .await
            .context("eth_getTransactionCount failed")
    }

    async fn send(&self, tx: &PreparedTx) -> Result<B256> {
        let request = self
            .call_request(tx.from, &tx.call)
            .with_gas_limit(tx.gas_limit)
            .with_gas_price(tx.gas_price)
            .with_nonce(tx.nonce)
            .with_chain_id(tx.chain_id);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .context("eth_sendRawTransaction failed")?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, nonce = tx.nonce, "Transaction broadcast");
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256, timeout: Duration) -> Result<Option<TxReceipt>> {
        let poll = async {
            loop {
                match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => {}
                    // Transient RPC errors do not end the wait; only the timeout does.
                    Err(e) => warn!(%tx_hash, error = %e, "Receipt poll failed"),
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(receipt) => Ok(Some(TxReceipt {
                tx_hash: receipt.transaction_hash,
                success: receipt.status(),
                gas_used: receipt.gas_used,
                block_number: receipt.block_number,
            })),
            Err(_) => Ok(None),
        }
    }
}
