//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IOwnable {
        function transferOwnership(address newOwner) external;
    }
}
