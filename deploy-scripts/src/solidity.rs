//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    function initialize() external;
    function Initialize() external;
}
