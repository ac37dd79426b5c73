//! Step narration in English, Japanese and Korean.

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Lang {
    #[default]
    En,
    Ja,
    Ko,
}

/// Procedure steps narrated while a scenario runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    Connect,
    LoadWallet,
    ObtainBalance,
    ObtainTokenAccounts,
    BuildSolTransfer,
    BuildTokenTransfer,
    FetchPool,
    ObtainQuote,
    SetPriceRange,
    SendTransaction,
    FetchPosition,
    GetFees,
    GetRewards,
    Harvest,
    GenerateBundleAddresses,
    BuildBundleInstruction,
    FetchBundle,
    FindUnusedBundleIndex,
    OpenBundledPosition,
    CreateMints,
    OrderMints,
    CreatePool,
    FetchCreatedPool,
    FetchTickArrays,
}

impl Step {
    pub fn text(self, lang: Lang) -> &'static str {
        use Lang::*;
        use Step::*;

        match (self, lang) {
            (Connect, En) => "Create a connection for sending RPC requests to Devnet",
            (Connect, Ja) => "Devnet の RPC への要求用のコネクションを作成",
            (Connect, Ko) => "Devnet RPC에 요청을 보내기 위한 커넥션 생성",
            (LoadWallet, En) => "Read in the private key from the wallet file",
            (LoadWallet, Ja) => "ウォレットファイルから秘密鍵を読み込み",
            (LoadWallet, Ko) => "지갑 파일에서 개인키 로딩",
            (ObtainBalance, En) => "Obtain the SOL balance",
            (ObtainBalance, Ja) => "SOL 残高取得",
            (ObtainBalance, Ko) => "SOL 잔액을 조회",
            (ObtainTokenAccounts, En) => "Obtain the token accounts from the wallet's public key",
            (ObtainTokenAccounts, Ja) => "ウォレットの公開鍵からトークンアカウントを取得",
            (ObtainTokenAccounts, Ko) => "지갑의 공개 키로 토큰 계정을 조회",
            (BuildSolTransfer, En) => "Build the instruction to send SOL",
            (BuildSolTransfer, Ja) => "SOLを送る命令を作成",
            (BuildSolTransfer, Ko) => "SOL을 보내는 명령을 생성",
            (BuildTokenTransfer, En) => "Create the instruction to send devSAMO",
            (BuildTokenTransfer, Ja) => "devSAMOを送る命令を作成",
            (BuildTokenTransfer, Ko) => "devSAMO를 보내는 명령을 생성",
            (FetchPool, En) => "Get the pool and its current price",
            (FetchPool, Ja) => "プールと現在価格を取得",
            (FetchPool, Ko) => "풀과 현재 가격을 조회",
            (ObtainQuote, En) => "Obtain the estimation",
            (ObtainQuote, Ja) => "見積もりを取得",
            (ObtainQuote, Ko) => "예상치를 가져옴",
            (SetPriceRange, En) => "Set price range, amount of tokens to deposit, and acceptable slippage",
            (SetPriceRange, Ja) => "価格帯とデポジットするトークンの量、許容するスリッページを設定",
            (SetPriceRange, Ko) => "가격 범위, 예치할 토큰 수량, 허용 슬리피지를 설정",
            (SendTransaction, En) => "Send the transaction",
            (SendTransaction, Ja) => "トランザクションを送信",
            (SendTransaction, Ko) => "트랜잭션 전송",
            (FetchPosition, En) => "Get the position and the pool to which the position belongs",
            (FetchPosition, Ja) => "ポジション・プール取得",
            (FetchPosition, Ko) => "포지션과 포지션이 속한 풀을 조회",
            (GetFees, En) => "Get trade fee",
            (GetFees, Ja) => "トレード手数料(フィー)の取得",
            (GetFees, Ko) => "거래 수수료 조회",
            (GetRewards, En) => "Get rewards",
            (GetRewards, Ja) => "リワードの取得",
            (GetRewards, Ko) => "리워드 조회",
            (Harvest, En) => "Create a transaction to harvest the position's earnings",
            (Harvest, Ja) => "ポジションの収益を収穫するためのトランザクションを生成",
            (Harvest, Ko) => "포지션 수익을 수확하는 트랜잭션 생성",
            (GenerateBundleAddresses, En) => "Generate the address of Mint, PDA, and ATA for PositionBundle",
            (GenerateBundleAddresses, Ja) => "PositionBundle 用の Mint, PDA, ATA のアドレスを生成",
            (GenerateBundleAddresses, Ko) => "PositionBundle용 Mint, PDA, ATA 주소 생성",
            (BuildBundleInstruction, En) => "Build the instruction to initialize PositionBundle",
            (BuildBundleInstruction, Ja) => "PositionBundle 初期化命令を作成",
            (BuildBundleInstruction, Ko) => "PositionBundle 초기화 명령 생성",
            (FetchBundle, En) => "Get PositionBundle account",
            (FetchBundle, Ja) => "PositionBundle アカウントを取得",
            (FetchBundle, Ko) => "PositionBundle 계정 조회",
            (FindUnusedBundleIndex, En) => "Get unused bundle indexes in PositionBundle",
            (FindUnusedBundleIndex, Ja) => "PositionBundle における未使用の bundle index を取得",
            (FindUnusedBundleIndex, Ko) => "PositionBundle에서 사용되지 않은 bundle index 조회",
            (OpenBundledPosition, En) => "Create an instruction to open the first position managed by PositionBundle",
            (OpenBundledPosition, Ja) => "PositionBundle で管理する 1 個目のポジションをオープンする命令を作成",
            (OpenBundledPosition, Ko) => "PositionBundle이 관리하는 첫 번째 포지션을 여는 명령 생성",
            (CreateMints, En) => "Create new token mints",
            (CreateMints, Ja) => "新たなトークンを作成",
            (CreateMints, Ko) => "새 토큰 민트 생성",
            (OrderMints, En) => "Token A and Token B Mint has to be cardinally ordered",
            (OrderMints, Ja) => "2 つのトークンを辞書順に並べ替え",
            (OrderMints, Ko) => "토큰 A와 토큰 B 민트를 주소 순서로 정렬",
            (CreatePool, En) => "Create a new pool",
            (CreatePool, Ja) => "プールを作成",
            (CreatePool, Ko) => "새 풀 생성",
            (FetchCreatedPool, En) => "Fetch pool data to verify the initial price and tick",
            (FetchCreatedPool, Ja) => "初期化したプールの Whirlpool アカウントを取得",
            (FetchCreatedPool, Ko) => "초기 가격과 틱을 확인하기 위해 풀 데이터 조회",
            (FetchTickArrays, En) => "Get TickArray and Tick",
            (FetchTickArrays, Ja) => "TickArray および Tick の取得",
            (FetchTickArrays, Ko) => "TickArray와 Tick 조회",
        }
    }
}
