//! The lockup NFT collection contract, as seen from the outside
//!
//! An [`NftCollection`] is a plain value: the collection's address and,
//! when it has not been deployed yet, the [`StateInit`] it will be deployed
//! with. It is built either from an address obtained elsewhere
//! ([`NftCollection::create_from_address`]) or from a [`CollectionConfig`]
//! and the collection code ([`NftCollection::create_from_config`]), in
//! which case the address is derived.
//!
//! The `send_*` methods encode a body and pass the resulting
//! [`InternalMessage`] to a [`ContractProvider`]. Encoding always finishes
//! before the provider is called.

use crate::address::Address;
use crate::cell::Cell;
use crate::coins::Coins;
use crate::error::{EncodeResult, SendError};
use crate::provider::{ContractProvider, InternalMessage, SendMode, Sender};
use crate::state_init::StateInit;

pub mod config;
pub mod message;

pub use self::config::{
    CollectionConfig, CollectionContent, RoyaltyParams, StakingParams, STAKING_KEY_BITS,
};
pub use self::message::{deploy_body, op, BatchMint, MintNft, MintRecord, OpHeader, MAX_BATCH_MINT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftCollection {
    address: Address,
    init: Option<StateInit>,
}

impl NftCollection {
    /// Wraps a collection that already lives at `address`.
    pub fn create_from_address(address: Address) -> Self {
        Self {
            address,
            init: None,
        }
    }

    /// Prepares a not-yet-deployed collection, deriving its address on
    /// `workchain` from `code` and the serialized `config`.
    pub fn create_from_config(
        config: &CollectionConfig,
        code: Cell,
        workchain: i8,
    ) -> EncodeResult<Self> {
        let data = config.to_data_cell()?;
        let init = StateInit::new(code, data);
        let address = init.address(workchain)?;
        tracing::info!(%address, "prepared collection deployment");
        Ok(Self {
            address,
            init: Some(init),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Initial state to attach when deploying, if this collection was built from config
    pub fn init(&self) -> Option<&StateInit> {
        self.init.as_ref()
    }

    fn message(&self, value: Coins, body: Cell, init: Option<StateInit>) -> InternalMessage {
        InternalMessage {
            to: self.address,
            value,
            bounce: None,
            send_mode: SendMode::PAY_GAS_SEPARATELY,
            init,
            body,
        }
    }

    fn send<P: ContractProvider>(
        provider: &mut P,
        via: &dyn Sender,
        message: InternalMessage,
    ) -> Result<(), SendError<P::Error>> {
        tracing::debug!(
            to = %message.to,
            value = %message.value,
            body = %message.body.hash_hex(),
            with_init = message.init.is_some(),
            "sending internal message"
        );
        provider.internal(via, message).map_err(SendError::Provider)
    }

    pub fn send_deploy<P: ContractProvider>(
        &self,
        provider: &mut P,
        via: &dyn Sender,
        value: Coins,
    ) -> Result<(), SendError<P::Error>> {
        let message = self.message(value, deploy_body(), self.init.clone());
        Self::send(provider, via, message)
    }

    pub fn send_mint_nft<P: ContractProvider>(
        &self,
        provider: &mut P,
        via: &dyn Sender,
        value: Coins,
        mint: &MintNft,
    ) -> Result<(), SendError<P::Error>> {
        let body = mint.to_body()?;
        Self::send(provider, via, self.message(value, body, None))
    }

    pub fn send_batch_mint<P: ContractProvider>(
        &self,
        provider: &mut P,
        via: &dyn Sender,
        value: Coins,
        batch: &BatchMint,
    ) -> Result<(), SendError<P::Error>> {
        let body = batch.to_body()?;
        Self::send(provider, via, self.message(value, body, None))
    }
}
