//! Ledger response status codes.
//!
//! Every response header and every receipt carries a numeric status. [`Status`] names the codes
//! this client knows; anything else decodes to [`Status::Unrecognized`] with the raw value kept
//! for diagnostics.
//!
//! # Wire format
//!
//! Statuses travel as protobuf enum values (`int32`). Use [`Status::code`] and
//! [`Status::from_code`] to convert. Serde uses the numeric code.
//!
//! The table follows the network's `ResponseCodeEnum`, whose numbering has holes (109, 114-149,
//! 151-154, 161). Those codes decode as unrecognized.
//!
//! Equality and hashing compare wire codes, so `Status::Unrecognized(22)` equals
//! `Status::Success`. Code that matches on variants goes through [`Status::normalized`].

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// Generates the [`Status`] enum and its code/name tables from one list.
macro_rules! define_status {
    ($( $variant:ident = $code:literal => $name:literal ),* $(,)?) => {
        /// A ledger response status.
        #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
        #[serde(from = "i32", into = "i32")]
        #[non_exhaustive]
        pub enum Status {
            $(
                #[doc = concat!("`", $name, "` (", stringify!($code), ").")]
                $variant,
            )*
            /// A code this client does not know. Prefer [`Status::from_code`], which picks the
            /// named variant whenever one exists.
            Unrecognized(i32),
        }

        impl Status {
            /// Maps a wire code to a status.
            #[must_use]
            pub const fn from_code(code: i32) -> Self {
                match code {
                    $( $code => Self::$variant, )*
                    other => Self::Unrecognized(other),
                }
            }

            /// Returns the wire code.
            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $( Self::$variant => $code, )*
                    Self::Unrecognized(code) => code,
                }
            }

            /// Returns the protocol name, or `None` for unrecognized codes.
            #[must_use]
            pub const fn name(self) -> Option<&'static str> {
                match self.normalized() {
                    $( Self::$variant => Some($name), )*
                    Self::Unrecognized(_) => None,
                }
            }

            /// Every known status, in code order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )* ];
        }
    };
}

define_status! {
    Ok = 0 => "OK",
    InvalidTransaction = 1 => "INVALID_TRANSACTION",
    PayerAccountNotFound = 2 => "PAYER_ACCOUNT_NOT_FOUND",
    InvalidNodeAccount = 3 => "INVALID_NODE_ACCOUNT",
    TransactionExpired = 4 => "TRANSACTION_EXPIRED",
    InvalidTransactionStart = 5 => "INVALID_TRANSACTION_START",
    InvalidTransactionDuration = 6 => "INVALID_TRANSACTION_DURATION",
    InvalidSignature = 7 => "INVALID_SIGNATURE",
    MemoTooLong = 8 => "MEMO_TOO_LONG",
    InsufficientTxFee = 9 => "INSUFFICIENT_TX_FEE",
    InsufficientPayerBalance = 10 => "INSUFFICIENT_PAYER_BALANCE",
    DuplicateTransaction = 11 => "DUPLICATE_TRANSACTION",
    Busy = 12 => "BUSY",
    NotSupported = 13 => "NOT_SUPPORTED",
    InvalidFileId = 14 => "INVALID_FILE_ID",
    InvalidAccountId = 15 => "INVALID_ACCOUNT_ID",
    InvalidContractId = 16 => "INVALID_CONTRACT_ID",
    InvalidTransactionId = 17 => "INVALID_TRANSACTION_ID",
    ReceiptNotFound = 18 => "RECEIPT_NOT_FOUND",
    RecordNotFound = 19 => "RECORD_NOT_FOUND",
    InvalidSolidityId = 20 => "INVALID_SOLIDITY_ID",
    Unknown = 21 => "UNKNOWN",
    Success = 22 => "SUCCESS",
    FailInvalid = 23 => "FAIL_INVALID",
    FailFee = 24 => "FAIL_FEE",
    FailBalance = 25 => "FAIL_BALANCE",
    KeyRequired = 26 => "KEY_REQUIRED",
    BadEncoding = 27 => "BAD_ENCODING",
    InsufficientAccountBalance = 28 => "INSUFFICIENT_ACCOUNT_BALANCE",
    InvalidSolidityAddress = 29 => "INVALID_SOLIDITY_ADDRESS",
    InsufficientGas = 30 => "INSUFFICIENT_GAS",
    ContractSizeLimitExceeded = 31 => "CONTRACT_SIZE_LIMIT_EXCEEDED",
    LocalCallModificationException = 32 => "LOCAL_CALL_MODIFICATION_EXCEPTION",
    ContractRevertExecuted = 33 => "CONTRACT_REVERT_EXECUTED",
    ContractExecutionException = 34 => "CONTRACT_EXECUTION_EXCEPTION",
    InvalidReceivingNodeAccount = 35 => "INVALID_RECEIVING_NODE_ACCOUNT",
    MissingQueryHeader = 36 => "MISSING_QUERY_HEADER",
    AccountUpdateFailed = 37 => "ACCOUNT_UPDATE_FAILED",
    InvalidKeyEncoding = 38 => "INVALID_KEY_ENCODING",
    NullSolidityAddress = 39 => "NULL_SOLIDITY_ADDRESS",
    ContractUpdateFailed = 40 => "CONTRACT_UPDATE_FAILED",
    InvalidQueryHeader = 41 => "INVALID_QUERY_HEADER",
    InvalidFeeSubmitted = 42 => "INVALID_FEE_SUBMITTED",
    InvalidPayerSignature = 43 => "INVALID_PAYER_SIGNATURE",
    KeyNotProvided = 44 => "KEY_NOT_PROVIDED",
    InvalidExpirationTime = 45 => "INVALID_EXPIRATION_TIME",
    NoWaclKey = 46 => "NO_WACL_KEY",
    FileContentEmpty = 47 => "FILE_CONTENT_EMPTY",
    InvalidAccountAmounts = 48 => "INVALID_ACCOUNT_AMOUNTS",
    EmptyTransactionBody = 49 => "EMPTY_TRANSACTION_BODY",
    InvalidTransactionBody = 50 => "INVALID_TRANSACTION_BODY",
    InvalidSignatureTypeMismatchingKey = 51 => "INVALID_SIGNATURE_TYPE_MISMATCHING_KEY",
    InvalidSignatureCountMismatchingKey = 52 => "INVALID_SIGNATURE_COUNT_MISMATCHING_KEY",
    EmptyLiveHashBody = 53 => "EMPTY_LIVE_HASH_BODY",
    EmptyLiveHash = 54 => "EMPTY_LIVE_HASH",
    EmptyLiveHashKeys = 55 => "EMPTY_LIVE_HASH_KEYS",
    InvalidLiveHashSize = 56 => "INVALID_LIVE_HASH_SIZE",
    EmptyQueryBody = 57 => "EMPTY_QUERY_BODY",
    EmptyLiveHashQuery = 58 => "EMPTY_LIVE_HASH_QUERY",
    LiveHashNotFound = 59 => "LIVE_HASH_NOT_FOUND",
    AccountIdDoesNotExist = 60 => "ACCOUNT_ID_DOES_NOT_EXIST",
    LiveHashAlreadyExists = 61 => "LIVE_HASH_ALREADY_EXISTS",
    InvalidFileWacl = 62 => "INVALID_FILE_WACL",
    SerializationFailed = 63 => "SERIALIZATION_FAILED",
    TransactionOversize = 64 => "TRANSACTION_OVERSIZE",
    TransactionTooManyLayers = 65 => "TRANSACTION_TOO_MANY_LAYERS",
    ContractDeleted = 66 => "CONTRACT_DELETED",
    PlatformNotActive = 67 => "PLATFORM_NOT_ACTIVE",
    KeyPrefixMismatch = 68 => "KEY_PREFIX_MISMATCH",
    PlatformTransactionNotCreated = 69 => "PLATFORM_TRANSACTION_NOT_CREATED",
    InvalidRenewalPeriod = 70 => "INVALID_RENEWAL_PERIOD",
    InvalidPayerAccountId = 71 => "INVALID_PAYER_ACCOUNT_ID",
    AccountDeleted = 72 => "ACCOUNT_DELETED",
    FileDeleted = 73 => "FILE_DELETED",
    AccountRepeatedInAccountAmounts = 74 => "ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS",
    SettingNegativeAccountBalance = 75 => "SETTING_NEGATIVE_ACCOUNT_BALANCE",
    ObtainerRequired = 76 => "OBTAINER_REQUIRED",
    ObtainerSameContractId = 77 => "OBTAINER_SAME_CONTRACT_ID",
    ObtainerDoesNotExist = 78 => "OBTAINER_DOES_NOT_EXIST",
    ModifyingImmutableContract = 79 => "MODIFYING_IMMUTABLE_CONTRACT",
    FileSystemException = 80 => "FILE_SYSTEM_EXCEPTION",
    AutorenewDurationNotInRange = 81 => "AUTORENEW_DURATION_NOT_IN_RANGE",
    ErrorDecodingBytestring = 82 => "ERROR_DECODING_BYTESTRING",
    ContractFileEmpty = 83 => "CONTRACT_FILE_EMPTY",
    ContractBytecodeEmpty = 84 => "CONTRACT_BYTECODE_EMPTY",
    InvalidInitialBalance = 85 => "INVALID_INITIAL_BALANCE",
    InvalidReceiveRecordThreshold = 86 => "INVALID_RECEIVE_RECORD_THRESHOLD",
    InvalidSendRecordThreshold = 87 => "INVALID_SEND_RECORD_THRESHOLD",
    AccountIsNotGenesisAccount = 88 => "ACCOUNT_IS_NOT_GENESIS_ACCOUNT",
    PayerAccountUnauthorized = 89 => "PAYER_ACCOUNT_UNAUTHORIZED",
    InvalidFreezeTransactionBody = 90 => "INVALID_FREEZE_TRANSACTION_BODY",
    FreezeTransactionBodyNotFound = 91 => "FREEZE_TRANSACTION_BODY_NOT_FOUND",
    TransferListSizeLimitExceeded = 92 => "TRANSFER_LIST_SIZE_LIMIT_EXCEEDED",
    ResultSizeLimitExceeded = 93 => "RESULT_SIZE_LIMIT_EXCEEDED",
    NotSpecialAccount = 94 => "NOT_SPECIAL_ACCOUNT",
    ContractNegativeGas = 95 => "CONTRACT_NEGATIVE_GAS",
    ContractNegativeValue = 96 => "CONTRACT_NEGATIVE_VALUE",
    InvalidFeeFile = 97 => "INVALID_FEE_FILE",
    InvalidExchangeRateFile = 98 => "INVALID_EXCHANGE_RATE_FILE",
    InsufficientLocalCallGas = 99 => "INSUFFICIENT_LOCAL_CALL_GAS",
    EntityNotAllowedToDelete = 100 => "ENTITY_NOT_ALLOWED_TO_DELETE",
    AuthorizationFailed = 101 => "AUTHORIZATION_FAILED",
    FileUploadedProtoInvalid = 102 => "FILE_UPLOADED_PROTO_INVALID",
    FileUploadedProtoNotSavedToDisk = 103 => "FILE_UPLOADED_PROTO_NOT_SAVED_TO_DISK",
    FeeScheduleFilePartUploaded = 104 => "FEE_SCHEDULE_FILE_PART_UPLOADED",
    ExchangeRateChangeLimitExceeded = 105 => "EXCHANGE_RATE_CHANGE_LIMIT_EXCEEDED",
    MaxContractStorageExceeded = 106 => "MAX_CONTRACT_STORAGE_EXCEEDED",
    TransferAccountSameAsDeleteAccount = 107 => "TRANSFER_ACCOUNT_SAME_AS_DELETE_ACCOUNT",
    TotalLedgerBalanceInvalid = 108 => "TOTAL_LEDGER_BALANCE_INVALID",
    ExpirationReductionNotAllowed = 110 => "EXPIRATION_REDUCTION_NOT_ALLOWED",
    MaxGasLimitExceeded = 111 => "MAX_GAS_LIMIT_EXCEEDED",
    MaxFileSizeExceeded = 112 => "MAX_FILE_SIZE_EXCEEDED",
    ReceiverSigRequired = 113 => "RECEIVER_SIG_REQUIRED",
    InvalidTopicId = 150 => "INVALID_TOPIC_ID",
    InvalidAdminKey = 155 => "INVALID_ADMIN_KEY",
    InvalidSubmitKey = 156 => "INVALID_SUBMIT_KEY",
    Unauthorized = 157 => "UNAUTHORIZED",
    InvalidTopicMessage = 158 => "INVALID_TOPIC_MESSAGE",
    InvalidAutorenewAccount = 159 => "INVALID_AUTORENEW_ACCOUNT",
    AutorenewAccountNotAllowed = 160 => "AUTORENEW_ACCOUNT_NOT_ALLOWED",
    TopicExpired = 162 => "TOPIC_EXPIRED",
    InvalidChunkNumber = 163 => "INVALID_CHUNK_NUMBER",
    InvalidChunkTransactionId = 164 => "INVALID_CHUNK_TRANSACTION_ID",
    AccountFrozenForToken = 165 => "ACCOUNT_FROZEN_FOR_TOKEN",
    TokensPerAccountLimitExceeded = 166 => "TOKENS_PER_ACCOUNT_LIMIT_EXCEEDED",
    InvalidTokenId = 167 => "INVALID_TOKEN_ID",
    InvalidTokenDecimals = 168 => "INVALID_TOKEN_DECIMALS",
    InvalidTokenInitialSupply = 169 => "INVALID_TOKEN_INITIAL_SUPPLY",
    InvalidTreasuryAccountForToken = 170 => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
    InvalidTokenSymbol = 171 => "INVALID_TOKEN_SYMBOL",
    TokenHasNoFreezeKey = 172 => "TOKEN_HAS_NO_FREEZE_KEY",
    TransfersNotZeroSumForToken = 173 => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
    MissingTokenSymbol = 174 => "MISSING_TOKEN_SYMBOL",
    TokenSymbolTooLong = 175 => "TOKEN_SYMBOL_TOO_LONG",
    AccountKycNotGrantedForToken = 176 => "ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN",
    TokenHasNoKycKey = 177 => "TOKEN_HAS_NO_KYC_KEY",
    InsufficientTokenBalance = 178 => "INSUFFICIENT_TOKEN_BALANCE",
    TokenWasDeleted = 179 => "TOKEN_WAS_DELETED",
    TokenHasNoSupplyKey = 180 => "TOKEN_HAS_NO_SUPPLY_KEY",
    TokenHasNoWipeKey = 181 => "TOKEN_HAS_NO_WIPE_KEY",
    InvalidTokenMintAmount = 182 => "INVALID_TOKEN_MINT_AMOUNT",
    InvalidTokenBurnAmount = 183 => "INVALID_TOKEN_BURN_AMOUNT",
    TokenNotAssociatedToAccount = 184 => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
    CannotWipeTokenTreasuryAccount = 185 => "CANNOT_WIPE_TOKEN_TREASURY_ACCOUNT",
    InvalidKycKey = 186 => "INVALID_KYC_KEY",
    InvalidWipeKey = 187 => "INVALID_WIPE_KEY",
    InvalidFreezeKey = 188 => "INVALID_FREEZE_KEY",
    InvalidSupplyKey = 189 => "INVALID_SUPPLY_KEY",
    MissingTokenName = 190 => "MISSING_TOKEN_NAME",
    TokenNameTooLong = 191 => "TOKEN_NAME_TOO_LONG",
    InvalidWipingAmount = 192 => "INVALID_WIPING_AMOUNT",
    TokenIsImmutable = 193 => "TOKEN_IS_IMMUTABLE",
    TokenAlreadyAssociatedToAccount = 194 => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
    TransactionRequiresZeroTokenBalances = 195 => "TRANSACTION_REQUIRES_ZERO_TOKEN_BALANCES",
    AccountIsTreasury = 196 => "ACCOUNT_IS_TREASURY",
    TokenIdRepeatedInTokenList = 197 => "TOKEN_ID_REPEATED_IN_TOKEN_LIST",
    TokenTransferListSizeLimitExceeded = 198 => "TOKEN_TRANSFER_LIST_SIZE_LIMIT_EXCEEDED",
    EmptyTokenTransferBody = 199 => "EMPTY_TOKEN_TRANSFER_BODY",
    EmptyTokenTransferAccountAmounts = 200 => "EMPTY_TOKEN_TRANSFER_ACCOUNT_AMOUNTS",
    InvalidScheduleId = 201 => "INVALID_SCHEDULE_ID",
    ScheduleIsImmutable = 202 => "SCHEDULE_IS_IMMUTABLE",
    InvalidSchedulePayerId = 203 => "INVALID_SCHEDULE_PAYER_ID",
    InvalidScheduleAccountId = 204 => "INVALID_SCHEDULE_ACCOUNT_ID",
    NoNewValidSignatures = 205 => "NO_NEW_VALID_SIGNATURES",
    UnresolvableRequiredSigners = 206 => "UNRESOLVABLE_REQUIRED_SIGNERS",
    ScheduledTransactionNotInWhitelist = 207 => "SCHEDULED_TRANSACTION_NOT_IN_WHITELIST",
    SomeSignaturesWereInvalid = 208 => "SOME_SIGNATURES_WERE_INVALID",
    TransactionIdFieldNotAllowed = 209 => "TRANSACTION_ID_FIELD_NOT_ALLOWED",
    IdenticalScheduleAlreadyCreated = 210 => "IDENTICAL_SCHEDULE_ALREADY_CREATED",
    InvalidZeroByteInString = 211 => "INVALID_ZERO_BYTE_IN_STRING",
    ScheduleAlreadyDeleted = 212 => "SCHEDULE_ALREADY_DELETED",
    ScheduleAlreadyExecuted = 213 => "SCHEDULE_ALREADY_EXECUTED",
    MessageSizeTooLarge = 214 => "MESSAGE_SIZE_TOO_LARGE",
    OperationRepeatedInBucketGroups = 215 => "OPERATION_REPEATED_IN_BUCKET_GROUPS",
    BucketCapacityOverflow = 216 => "BUCKET_CAPACITY_OVERFLOW",
    NodeCapacityNotSufficientForOperation = 217 => "NODE_CAPACITY_NOT_SUFFICIENT_FOR_OPERATION",
    BucketHasNoThrottleGroups = 218 => "BUCKET_HAS_NO_THROTTLE_GROUPS",
    ThrottleGroupHasZeroOpsPerSec = 219 => "THROTTLE_GROUP_HAS_ZERO_OPS_PER_SEC",
    SuccessButMissingExpectedOperation = 220 => "SUCCESS_BUT_MISSING_EXPECTED_OPERATION",
    UnparseableThrottleDefinitions = 221 => "UNPARSEABLE_THROTTLE_DEFINITIONS",
    InvalidThrottleDefinitions = 222 => "INVALID_THROTTLE_DEFINITIONS",
    AccountExpiredAndPendingRemoval = 223 => "ACCOUNT_EXPIRED_AND_PENDING_REMOVAL",
    InvalidTokenMaxSupply = 224 => "INVALID_TOKEN_MAX_SUPPLY",
    InvalidTokenNftSerialNumber = 225 => "INVALID_TOKEN_NFT_SERIAL_NUMBER",
    InvalidNftId = 226 => "INVALID_NFT_ID",
    MetadataTooLong = 227 => "METADATA_TOO_LONG",
    BatchSizeLimitExceeded = 228 => "BATCH_SIZE_LIMIT_EXCEEDED",
    InvalidQueryRange = 229 => "INVALID_QUERY_RANGE",
    FractionDividesByZero = 230 => "FRACTION_DIVIDES_BY_ZERO",
    InsufficientPayerBalanceForCustomFee = 231 => "INSUFFICIENT_PAYER_BALANCE_FOR_CUSTOM_FEE",
    CustomFeesListTooLong = 232 => "CUSTOM_FEES_LIST_TOO_LONG",
    InvalidCustomFeeCollector = 233 => "INVALID_CUSTOM_FEE_COLLECTOR",
    InvalidTokenIdInCustomFees = 234 => "INVALID_TOKEN_ID_IN_CUSTOM_FEES",
    TokenNotAssociatedToFeeCollector = 235 => "TOKEN_NOT_ASSOCIATED_TO_FEE_COLLECTOR",
    TokenMaxSupplyReached = 236 => "TOKEN_MAX_SUPPLY_REACHED",
    SenderDoesNotOwnNftSerialNo = 237 => "SENDER_DOES_NOT_OWN_NFT_SERIAL_NO",
    CustomFeeNotFullySpecified = 238 => "CUSTOM_FEE_NOT_FULLY_SPECIFIED",
    CustomFeeMustBePositive = 239 => "CUSTOM_FEE_MUST_BE_POSITIVE",
    TokenHasNoFeeScheduleKey = 240 => "TOKEN_HAS_NO_FEE_SCHEDULE_KEY",
    CustomFeeOutsideNumericRange = 241 => "CUSTOM_FEE_OUTSIDE_NUMERIC_RANGE",
    RoyaltyFractionCannotExceedOne = 242 => "ROYALTY_FRACTION_CANNOT_EXCEED_ONE",
    FractionalFeeMaxAmountLessThanMinAmount = 243 => "FRACTIONAL_FEE_MAX_AMOUNT_LESS_THAN_MIN_AMOUNT",
    CustomScheduleAlreadyHasNoFees = 244 => "CUSTOM_SCHEDULE_ALREADY_HAS_NO_FEES",
    CustomFeeDenominationMustBeFungibleCommon = 245 => "CUSTOM_FEE_DENOMINATION_MUST_BE_FUNGIBLE_COMMON",
    CustomFractionalFeeOnlyAllowedForFungibleCommon = 246 => "CUSTOM_FRACTIONAL_FEE_ONLY_ALLOWED_FOR_FUNGIBLE_COMMON",
    InvalidCustomFeeScheduleKey = 247 => "INVALID_CUSTOM_FEE_SCHEDULE_KEY",
    InvalidTokenMintMetadata = 248 => "INVALID_TOKEN_MINT_METADATA",
    InvalidTokenBurnMetadata = 249 => "INVALID_TOKEN_BURN_METADATA",
    CurrentTreasuryStillOwnsNfts = 250 => "CURRENT_TREASURY_STILL_OWNS_NFTS",
    AccountStillOwnsNfts = 251 => "ACCOUNT_STILL_OWNS_NFTS",
    TreasuryMustOwnBurnedNft = 252 => "TREASURY_MUST_OWN_BURNED_NFT",
    AccountDoesNotOwnWipedNft = 253 => "ACCOUNT_DOES_NOT_OWN_WIPED_NFT",
    AccountAmountTransfersOnlyAllowedForFungibleCommon = 254 => "ACCOUNT_AMOUNT_TRANSFERS_ONLY_ALLOWED_FOR_FUNGIBLE_COMMON",
    MaxNftsInPriceRegimeHaveBeenMinted = 255 => "MAX_NFTS_IN_PRICE_REGIME_HAVE_BEEN_MINTED",
    PayerAccountDeleted = 256 => "PAYER_ACCOUNT_DELETED",
    CustomFeeChargingExceededMaxRecursionDepth = 257 => "CUSTOM_FEE_CHARGING_EXCEEDED_MAX_RECURSION_DEPTH",
    CustomFeeChargingExceededMaxAccountAmounts = 258 => "CUSTOM_FEE_CHARGING_EXCEEDED_MAX_ACCOUNT_AMOUNTS",
    InsufficientSenderAccountBalanceForCustomFee = 259 => "INSUFFICIENT_SENDER_ACCOUNT_BALANCE_FOR_CUSTOM_FEE",
    SerialNumberLimitReached = 260 => "SERIAL_NUMBER_LIMIT_REACHED",
    CustomRoyaltyFeeOnlyAllowedForNonFungibleUnique = 261 => "CUSTOM_ROYALTY_FEE_ONLY_ALLOWED_FOR_NON_FUNGIBLE_UNIQUE",
    NoRemainingAutomaticAssociations = 262 => "NO_REMAINING_AUTOMATIC_ASSOCIATIONS",
    ExistingAutomaticAssociationsExceedGivenLimit = 263 => "EXISTING_AUTOMATIC_ASSOCIATIONS_EXCEED_GIVEN_LIMIT",
    RequestedNumAutomaticAssociationsExceedsAssociationLimit = 264 => "REQUESTED_NUM_AUTOMATIC_ASSOCIATIONS_EXCEEDS_ASSOCIATION_LIMIT",
    TokenIsPaused = 265 => "TOKEN_IS_PAUSED",
    TokenHasNoPauseKey = 266 => "TOKEN_HAS_NO_PAUSE_KEY",
    InvalidPauseKey = 267 => "INVALID_PAUSE_KEY",
    FreezeUpdateFileDoesNotExist = 268 => "FREEZE_UPDATE_FILE_DOES_NOT_EXIST",
    FreezeUpdateFileHashDoesNotMatch = 269 => "FREEZE_UPDATE_FILE_HASH_DOES_NOT_MATCH",
    NoUpgradeHasBeenPrepared = 270 => "NO_UPGRADE_HAS_BEEN_PREPARED",
    NoFreezeIsScheduled = 271 => "NO_FREEZE_IS_SCHEDULED",
    UpdateFileHashChangedSincePrepareUpgrade = 272 => "UPDATE_FILE_HASH_CHANGED_SINCE_PREPARE_UPGRADE",
    FreezeStartTimeMustBeFuture = 273 => "FREEZE_START_TIME_MUST_BE_FUTURE",
    PreparedUpdateFileIsImmutable = 274 => "PREPARED_UPDATE_FILE_IS_IMMUTABLE",
    FreezeAlreadyScheduled = 275 => "FREEZE_ALREADY_SCHEDULED",
    FreezeUpgradeInProgress = 276 => "FREEZE_UPGRADE_IN_PROGRESS",
    UpdateFileIdDoesNotMatchPrepared = 277 => "UPDATE_FILE_ID_DOES_NOT_MATCH_PREPARED",
    UpdateFileHashDoesNotMatchPrepared = 278 => "UPDATE_FILE_HASH_DOES_NOT_MATCH_PREPARED",
    ConsensusGasExhausted = 279 => "CONSENSUS_GAS_EXHAUSTED",
    RevertedSuccess = 280 => "REVERTED_SUCCESS",
    MaxStorageInPriceRegimeHasBeenUsed = 281 => "MAX_STORAGE_IN_PRICE_REGIME_HAS_BEEN_USED",
    InvalidAliasKey = 282 => "INVALID_ALIAS_KEY",
    UnexpectedTokenDecimals = 283 => "UNEXPECTED_TOKEN_DECIMALS",
    InvalidProxyAccountId = 284 => "INVALID_PROXY_ACCOUNT_ID",
    InvalidTransferAccountId = 285 => "INVALID_TRANSFER_ACCOUNT_ID",
    InvalidFeeCollectorAccountId = 286 => "INVALID_FEE_COLLECTOR_ACCOUNT_ID",
    AliasIsImmutable = 287 => "ALIAS_IS_IMMUTABLE",
    SpenderAccountSameAsOwner = 288 => "SPENDER_ACCOUNT_SAME_AS_OWNER",
    AmountExceedsTokenMaxSupply = 289 => "AMOUNT_EXCEEDS_TOKEN_MAX_SUPPLY",
    NegativeAllowanceAmount = 290 => "NEGATIVE_ALLOWANCE_AMOUNT",
    CannotApproveForAllFungibleCommon = 291 => "CANNOT_APPROVE_FOR_ALL_FUNGIBLE_COMMON",
    SpenderDoesNotHaveAllowance = 292 => "SPENDER_DOES_NOT_HAVE_ALLOWANCE",
    AmountExceedsAllowance = 293 => "AMOUNT_EXCEEDS_ALLOWANCE",
    MaxAllowancesExceeded = 294 => "MAX_ALLOWANCES_EXCEEDED",
    EmptyAllowances = 295 => "EMPTY_ALLOWANCES",
    SpenderAccountRepeatedInAllowances = 296 => "SPENDER_ACCOUNT_REPEATED_IN_ALLOWANCES",
    RepeatedSerialNumsInNftAllowances = 297 => "REPEATED_SERIAL_NUMS_IN_NFT_ALLOWANCES",
    FungibleTokenInNftAllowances = 298 => "FUNGIBLE_TOKEN_IN_NFT_ALLOWANCES",
    NftInFungibleTokenAllowances = 299 => "NFT_IN_FUNGIBLE_TOKEN_ALLOWANCES",
    InvalidAllowanceOwnerId = 300 => "INVALID_ALLOWANCE_OWNER_ID",
    InvalidAllowanceSpenderId = 301 => "INVALID_ALLOWANCE_SPENDER_ID",
    RepeatedAllowancesToDelete = 302 => "REPEATED_ALLOWANCES_TO_DELETE",
    InvalidDelegatingSpender = 303 => "INVALID_DELEGATING_SPENDER",
    DelegatingSpenderCannotGrantApproveForAll = 304 => "DELEGATING_SPENDER_CANNOT_GRANT_APPROVE_FOR_ALL",
    DelegatingSpenderDoesNotHaveApproveForAll = 305 => "DELEGATING_SPENDER_DOES_NOT_HAVE_APPROVE_FOR_ALL",
    ScheduleExpirationTimeTooFarInFuture = 306 => "SCHEDULE_EXPIRATION_TIME_TOO_FAR_IN_FUTURE",
    ScheduleExpirationTimeMustBeHigherThanConsensusTime = 307 => "SCHEDULE_EXPIRATION_TIME_MUST_BE_HIGHER_THAN_CONSENSUS_TIME",
    ScheduleFutureThrottleExceeded = 308 => "SCHEDULE_FUTURE_THROTTLE_EXCEEDED",
    ScheduleFutureGasLimitExceeded = 309 => "SCHEDULE_FUTURE_GAS_LIMIT_EXCEEDED",
    InvalidEthereumTransaction = 310 => "INVALID_ETHEREUM_TRANSACTION",
    WrongChainId = 311 => "WRONG_CHAIN_ID",
    WrongNonce = 312 => "WRONG_NONCE",
    AccessListUnsupported = 313 => "ACCESS_LIST_UNSUPPORTED",
    SchedulePendingExpiration = 314 => "SCHEDULE_PENDING_EXPIRATION",
    ContractIsTokenTreasury = 315 => "CONTRACT_IS_TOKEN_TREASURY",
    ContractHasNonZeroTokenBalances = 316 => "CONTRACT_HAS_NON_ZERO_TOKEN_BALANCES",
    ContractExpiredAndPendingRemoval = 317 => "CONTRACT_EXPIRED_AND_PENDING_REMOVAL",
    ContractHasNoAutoRenewAccount = 318 => "CONTRACT_HAS_NO_AUTO_RENEW_ACCOUNT",
    PermanentRemovalRequiresSystemInitiation = 319 => "PERMANENT_REMOVAL_REQUIRES_SYSTEM_INITIATION",
    ProxyAccountIdFieldIsDeprecated = 320 => "PROXY_ACCOUNT_ID_FIELD_IS_DEPRECATED",
    SelfStakingIsNotAllowed = 321 => "SELF_STAKING_IS_NOT_ALLOWED",
    InvalidStakingId = 322 => "INVALID_STAKING_ID",
    StakingNotEnabled = 323 => "STAKING_NOT_ENABLED",
    InvalidPrngRange = 324 => "INVALID_PRNG_RANGE",
    MaxEntitiesInPriceRegimeHaveBeenCreated = 325 => "MAX_ENTITIES_IN_PRICE_REGIME_HAVE_BEEN_CREATED",
    InvalidFullPrefixSignatureForPrecompile = 326 => "INVALID_FULL_PREFIX_SIGNATURE_FOR_PRECOMPILE",
    InsufficientBalancesForStorageRent = 327 => "INSUFFICIENT_BALANCES_FOR_STORAGE_RENT",
    MaxChildRecordsExceeded = 328 => "MAX_CHILD_RECORDS_EXCEEDED",
    InsufficientBalancesForRenewalFees = 329 => "INSUFFICIENT_BALANCES_FOR_RENEWAL_FEES",
    TransactionHasUnknownFields = 330 => "TRANSACTION_HAS_UNKNOWN_FIELDS",
    AccountIsImmutable = 331 => "ACCOUNT_IS_IMMUTABLE",
    AliasAlreadyAssigned = 332 => "ALIAS_ALREADY_ASSIGNED",
    InvalidMetadataKey = 333 => "INVALID_METADATA_KEY",
    TokenHasNoMetadataKey = 334 => "TOKEN_HAS_NO_METADATA_KEY",
    MissingTokenMetadata = 335 => "MISSING_TOKEN_METADATA",
    MissingSerialNumbers = 336 => "MISSING_SERIAL_NUMBERS",
    TokenHasNoAdminKey = 337 => "TOKEN_HAS_NO_ADMIN_KEY",
    NodeDeleted = 338 => "NODE_DELETED",
    InvalidNodeId = 339 => "INVALID_NODE_ID",
    InvalidGossipEndpoint = 340 => "INVALID_GOSSIP_ENDPOINT",
    InvalidNodeAccountId = 341 => "INVALID_NODE_ACCOUNT_ID",
    InvalidNodeDescription = 342 => "INVALID_NODE_DESCRIPTION",
    InvalidServiceEndpoint = 343 => "INVALID_SERVICE_ENDPOINT",
    InvalidGossipCaCertificate = 344 => "INVALID_GOSSIP_CA_CERTIFICATE",
    InvalidGrpcCertificate = 345 => "INVALID_GRPC_CERTIFICATE",
    InvalidMaxAutoAssociations = 346 => "INVALID_MAX_AUTO_ASSOCIATIONS",
    MaxNodesCreated = 347 => "MAX_NODES_CREATED",
    IpFqdnCannotBeSetForSameEndpoint = 348 => "IP_FQDN_CANNOT_BE_SET_FOR_SAME_ENDPOINT",
    GossipEndpointCannotHaveFqdn = 349 => "GOSSIP_ENDPOINT_CANNOT_HAVE_FQDN",
    FqdnSizeTooLarge = 350 => "FQDN_SIZE_TOO_LARGE",
    InvalidEndpoint = 351 => "INVALID_ENDPOINT",
    GossipEndpointsExceededLimit = 352 => "GOSSIP_ENDPOINTS_EXCEEDED_LIMIT",
    TokenReferenceRepeated = 353 => "TOKEN_REFERENCE_REPEATED",
    InvalidOwnerId = 354 => "INVALID_OWNER_ID",
    TokenReferenceListSizeLimitExceeded = 355 => "TOKEN_REFERENCE_LIST_SIZE_LIMIT_EXCEEDED",
    ServiceEndpointsExceededLimit = 356 => "SERVICE_ENDPOINTS_EXCEEDED_LIMIT",
    InvalidIpv4Address = 357 => "INVALID_IPV4_ADDRESS",
    EmptyTokenReferenceList = 358 => "EMPTY_TOKEN_REFERENCE_LIST",
    UpdateNodeAccountNotAllowed = 359 => "UPDATE_NODE_ACCOUNT_NOT_ALLOWED",
    TokenHasNoMetadataOrSupplyKey = 360 => "TOKEN_HAS_NO_METADATA_OR_SUPPLY_KEY",
    EmptyPendingAirdropIdList = 361 => "EMPTY_PENDING_AIRDROP_ID_LIST",
    PendingAirdropIdRepeated = 362 => "PENDING_AIRDROP_ID_REPEATED",
    PendingAirdropIdListTooLong = 363 => "PENDING_AIRDROP_ID_LIST_TOO_LONG",
    PendingNftAirdropAlreadyExists = 364 => "PENDING_NFT_AIRDROP_ALREADY_EXISTS",
    AccountHasPendingAirdrops = 365 => "ACCOUNT_HAS_PENDING_AIRDROPS",
    ThrottledAtConsensus = 366 => "THROTTLED_AT_CONSENSUS",
}

impl Status {
    /// Returns the canonical variant for this status's code.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self::from_code(self.code())
    }

    /// Whether a receipt carrying this status is terminal and successful.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self.normalized(), Self::Success)
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNRECOGNIZED({})", self.code()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_code_round_trip_for_all_known() {
        for status in Status::ALL {
            assert_eq!(Status::from_code(status.code()), *status);
        }
    }

    #[test]
    fn test_codes_and_names_are_unique() {
        let codes: HashSet<_> = Status::ALL.iter().map(|s| s.code()).collect();
        let names: HashSet<_> = Status::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(codes.len(), Status::ALL.len());
        assert_eq!(names.len(), Status::ALL.len());
    }

    #[test]
    fn test_unrecognized_keeps_raw_code() {
        for code in [109, 114, 149, 151, 161, 4242, -1] {
            let status = Status::from_code(code);
            assert!(matches!(status, Status::Unrecognized(c) if c == code), "{code}");
            assert_eq!(status.code(), code);
            assert_eq!(status.to_string(), format!("UNRECOGNIZED({code})"));
        }
    }

    #[test]
    fn test_token_schedule_and_fee_codes_are_named() {
        assert_eq!(Status::from_code(150), Status::InvalidTopicId);
        assert_eq!(Status::from_code(167).to_string(), "INVALID_TOKEN_ID");
        assert_eq!(Status::from_code(201).to_string(), "INVALID_SCHEDULE_ID");
        assert_eq!(Status::from_code(231).to_string(), "INSUFFICIENT_PAYER_BALANCE_FOR_CUSTOM_FEE");
        assert_eq!(Status::from_code(312), Status::WrongNonce);
        assert_eq!(Status::from_code(365).to_string(), "ACCOUNT_HAS_PENDING_AIRDROPS");
    }

    #[test]
    fn test_table_is_in_code_order() {
        assert!(Status::ALL.windows(2).all(|pair| pair[0].code() < pair[1].code()));
        assert_eq!(Status::ALL.last().map(|s| s.code()), Some(366));
    }

    #[test]
    fn test_unrecognized_with_known_code_equals_named() {
        let raw = Status::Unrecognized(22);
        assert_eq!(raw, Status::Success);
        assert_eq!(raw.normalized(), Status::Success);
        assert!(matches!(raw.normalized(), Status::Success));
        assert!(raw.is_success());
        assert_eq!(raw.to_string(), "SUCCESS");

        let set: HashSet<Status> = [raw, Status::Success].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display_uses_protocol_name() {
        assert_eq!(Status::Busy.to_string(), "BUSY");
        assert_eq!(Status::from_code(22).to_string(), "SUCCESS");
        assert_eq!(Status::ThrottledAtConsensus.code(), 366);
    }

    #[test]
    fn test_serde_as_code() {
        assert_eq!(serde_json::to_string(&Status::InvalidSignature).unwrap(), "7");
        assert_eq!(serde_json::from_str::<Status>("12").unwrap(), Status::Busy);
        assert_eq!(serde_json::from_str::<Status>("4242").unwrap(), Status::Unrecognized(4242));
    }
}
