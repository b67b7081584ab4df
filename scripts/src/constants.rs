//! Constants used in the deploy scripts

use alloy::primitives::U256;

/// The named account that signs deployments
pub const DEPLOYER_ACCOUNT: &str = "deployer";

/// The deployment name of the dice game contract
pub const DICE_GAME_CONTRACT: &str = "DiceGame";

/// The deployment name of the rigged roll contract
pub const RIGGED_ROLL_CONTRACT: &str = "RiggedRoll";

/// The tag selecting the dice game deployment
pub const DICE_GAME_TAG: &str = "DiceGame";

/// The tag selecting the rigged roll deployment
pub const RIGGED_ROLL_TAG: &str = "RiggedRoll";

/// The amount of wei the dice game is funded with at construction, 0.05 ETH
pub const DICE_GAME_FUNDING_WEI: U256 = U256::from_limbs([50_000_000_000_000_000, 0, 0, 0]);

/// How many nonces of a deployer are searched when seeding a simulated chain
/// with a recorded deployment
pub const MAX_SEEDED_NONCE: u64 = 1024;

/// Chain IDs of local development networks, on which `autoMine` is honored
pub const LOCAL_CHAIN_IDS: [u64; 2] = [31337, 1337];

/// The default RPC URL, a local Anvil / Hardhat node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default network name under which deployments are recorded
pub const DEFAULT_NETWORK: &str = "localhost";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default directory holding compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
