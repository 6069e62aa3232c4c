use crate::domain::ports::TokenGatewayRef;
use crate::domain::token::{
    TokenDeletion, TokenInfo, TokenListResponse, TokenStatus, TokenUpdateResponse,
};
use crate::error::{ProvisioningError, Result};
use tracing::{info, instrument, warn};

const LIST_TOKENS: &str = "list_tokens";
const GET_TOKEN: &str = "get_token";
const UPDATE_TOKEN: &str = "update_token";
const DELETE_TOKEN: &str = "delete_token";

/// Read, update and delete operations over provisioned tokens.
///
/// The gateway is the only source of truth. In particular the registry does
/// not check status transitions itself: the gateway decides whether a move
/// out of `DELETED` is legal and reports the result.
pub struct TokenRegistry {
    gateway: TokenGatewayRef,
}

impl TokenRegistry {
    pub fn new(gateway: TokenGatewayRef) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, card_identifier: &str) -> Result<TokenListResponse> {
        let raw = self.gateway.list_tokens(card_identifier).await?;
        raw.normalize(LIST_TOKENS)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, token_reference_id: &str) -> Result<TokenInfo> {
        let raw = self
            .gateway
            .get_token(token_reference_id)
            .await?
            .ok_or_else(|| ProvisioningError::TokenNotFound(token_reference_id.to_string()))?;
        let token = raw.normalize(GET_TOKEN)?;
        ensure_same_token(GET_TOKEN, token_reference_id, &token.token_reference_id)?;
        Ok(token)
    }

    /// Requests a status change. `new_status` must name one of the four
    /// token states (case-insensitive); anything else is rejected before the
    /// gateway is called.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        token_reference_id: &str,
        new_status: &str,
    ) -> Result<TokenUpdateResponse> {
        let status: TokenStatus = new_status.parse()?;
        let raw = self
            .gateway
            .update_token(token_reference_id, status.as_wire())
            .await?
            .ok_or_else(|| ProvisioningError::TokenNotFound(token_reference_id.to_string()))?;
        let update = raw.normalize(UPDATE_TOKEN)?;
        ensure_same_token(UPDATE_TOKEN, token_reference_id, &update.token_reference_id)?;

        if update.token_status == status {
            info!(status = %update.token_status, result = %update.update_result, "token status updated");
        } else {
            warn!(
                requested = %status,
                current = %update.token_status,
                result = %update.update_result,
                "gateway did not apply requested status"
            );
        }
        Ok(update)
    }

    /// Deletes a token. Repeated deletes are not an error; the gateway's
    /// idempotent result is passed through.
    #[instrument(skip(self))]
    pub async fn delete(&self, token_reference_id: &str) -> Result<TokenDeletion> {
        let raw = self
            .gateway
            .delete_token(token_reference_id)
            .await?
            .ok_or_else(|| ProvisioningError::TokenNotFound(token_reference_id.to_string()))?;
        let deletion = raw.normalize(DELETE_TOKEN)?;
        ensure_same_token(DELETE_TOKEN, token_reference_id, &deletion.token_reference_id)?;
        info!(result = %deletion.deletion_result, "token deleted");
        Ok(deletion)
    }
}

fn ensure_same_token(operation: &'static str, requested: &str, returned: &str) -> Result<()> {
    if requested == returned {
        Ok(())
    } else {
        Err(ProvisioningError::malformed(
            operation,
            format!("asked for token {requested}, gateway answered for {returned}"),
        ))
    }
}
