/// 로트 추가
pub const INSERT_LOT: &str = r#"
    INSERT INTO lots (item_name, quantity, base_price, date_added)
    VALUES (?, ?, ?, ?)
    RETURNING id
"#;

/// 모든 로트 조회 (최근 추가 순)
pub const GET_ALL_LOTS: &str = r#"
    SELECT id, item_name AS name, quantity, base_price, date_added AS created_at
    FROM lots
    ORDER BY id DESC
"#;

/// 로트 조회
pub const GET_LOT: &str = r#"
    SELECT id, item_name AS name, quantity, base_price, date_added AS created_at
    FROM lots
    WHERE id = ?
"#;

/// 로트 기준가 조회
pub const GET_LOT_BASE_PRICE: &str = "SELECT base_price FROM lots WHERE id = ?";

/// 로트 수 조회
pub const COUNT_LOTS: &str = "SELECT COUNT(*) FROM lots";

/// 입찰 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (bidder, lot_id, bid_amount, timestamp)
    VALUES (?, ?, ?, ?)
    RETURNING id
"#;

/// 로트별 상위 입찰 조회. 동액이면 먼저 들어온 입찰이 앞선다.
pub const GET_TOP_BIDS: &str = r#"
    SELECT id, bidder, lot_id, bid_amount AS amount, timestamp AS created_at
    FROM bids
    WHERE lot_id = ?
    ORDER BY bid_amount DESC, timestamp ASC, id ASC
    LIMIT ?
"#;

/// 모든 입찰 조회 (스키마 확인용)
pub const GET_ALL_BIDS: &str = r#"
    SELECT id, bidder, lot_id, bid_amount AS amount, timestamp AS created_at
    FROM bids
"#;

/// 입찰자별 입찰 조회 (최신 순)
pub const GET_BIDS_BY_BIDDER: &str = r#"
    SELECT id, bidder, lot_id, bid_amount AS amount, timestamp AS created_at
    FROM bids
    WHERE bidder = ?
    ORDER BY timestamp DESC, id DESC
"#;

/// 입찰자별 입찰 내역 조회 (로트 이름 포함, 최신 순)
pub const GET_BIDDER_HISTORY: &str = r#"
    SELECT bids.id, bids.bidder, bids.lot_id, lots.item_name,
           bids.bid_amount AS amount, bids.timestamp AS created_at
    FROM bids
    JOIN lots ON bids.lot_id = lots.id
    WHERE bids.bidder = ?
    ORDER BY bids.timestamp DESC, bids.id DESC
"#;
