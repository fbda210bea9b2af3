use cosmwasm_std::StdError;
use lucky_draw_common::DrawError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Draw(#[from] DrawError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },
}
