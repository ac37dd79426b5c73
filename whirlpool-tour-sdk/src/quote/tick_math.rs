use anyhow::Result;
use ruint::aliases::U256;
use whirlpool_tour_client::{accounts::TICK_ARRAY_SIZE, errors::WhirlpoolError};

pub const MIN_TICK_INDEX: i32 = -443_636;
pub const MAX_TICK_INDEX: i32 = 443_636;
pub const MIN_SQRT_PRICE: u128 = 4_295_048_016;
pub const MAX_SQRT_PRICE: u128 = 79_226_673_515_401_279_992_447_579_055;

/// Pools with a tick spacing at or above this value only accept full range positions.
pub const FULL_RANGE_ONLY_TICK_SPACING_THRESHOLD: u16 = 32_768;

const Q64: u128 = 1 << 64;

// Q96 factors sqrt(1.0001)^(2^i) for i = 1..=18, used for positive ticks.
const POSITIVE_TICK_FACTORS: [u128; 18] = [
    79_236_085_330_515_764_027_303_304_731,
    79_244_008_939_048_815_603_706_035_061,
    79_259_858_533_276_714_757_314_932_305,
    79_291_567_232_598_584_799_939_703_904,
    79_355_022_692_464_371_645_785_046_466,
    79_482_085_999_252_804_386_437_311_141,
    79_736_823_300_114_093_921_829_183_326,
    80_248_749_790_819_932_309_965_073_892,
    81_282_483_887_344_747_381_513_967_011,
    83_390_072_131_320_151_908_154_831_281,
    87_770_609_709_833_776_024_991_924_138,
    97_234_110_755_111_693_312_479_820_773,
    119_332_217_159_966_728_226_237_229_890,
    179_736_315_981_702_064_433_883_588_727,
    407_748_233_172_238_350_107_850_275_304,
    2_098_478_828_474_011_932_436_660_412_517,
    55_581_415_166_113_811_149_459_800_483_533,
    38_992_368_544_603_139_932_233_054_999_993_551,
];

// Q64 factors sqrt(1.0001)^(-2^i) for i = 1..=18, used for negative ticks.
const NEGATIVE_TICK_FACTORS: [u128; 18] = [
    18_444_899_583_751_176_498,
    18_443_055_278_223_354_162,
    18_439_367_220_385_604_838,
    18_431_993_317_065_449_817,
    18_417_254_355_718_160_513,
    18_387_811_781_193_591_352,
    18_329_067_761_203_520_168,
    18_212_142_134_806_087_854,
    17_980_523_815_641_551_639,
    17_526_086_738_831_147_013,
    16_651_378_430_235_024_244,
    15_030_750_278_693_429_944,
    12_247_334_978_882_834_399,
    8_131_365_268_884_726_200,
    3_584_323_654_723_342_297,
    696_457_651_847_595_233,
    26_294_789_957_452_057,
    37_481_735_321_082,
];

/// Q64.64 square root of `1.0001^tick_index`.
pub fn tick_index_to_sqrt_price(tick_index: i32) -> Result<u128> {
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_index) {
        return Err(WhirlpoolError::InvalidTickIndex.into());
    }

    if tick_index >= 0 {
        let tick = tick_index as u32;
        let mut ratio: u128 = if tick & 1 != 0 {
            79_232_123_823_359_799_118_286_999_567
        } else {
            79_228_162_514_264_337_593_543_950_336
        };
        for (bit, factor) in POSITIVE_TICK_FACTORS.iter().enumerate() {
            if tick & (2 << bit) != 0 {
                ratio = ((U256::from(ratio) * U256::from(*factor)) >> 96usize).to::<u128>();
            }
        }
        Ok(ratio >> 32)
    } else {
        let tick = tick_index.unsigned_abs();
        let mut ratio: u128 = if tick & 1 != 0 {
            18_445_821_805_675_392_311
        } else {
            Q64
        };
        for (bit, factor) in NEGATIVE_TICK_FACTORS.iter().enumerate() {
            if tick & (2 << bit) != 0 {
                ratio = (ratio * factor) >> 64;
            }
        }
        Ok(ratio)
    }
}

/// Greatest tick index whose sqrt price is at or below `sqrt_price`.
pub fn sqrt_price_to_tick_index(sqrt_price: u128) -> Result<i32> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(WhirlpoolError::SqrtPriceOutOfBounds.into());
    }

    let msb = 127 - sqrt_price.leading_zeros();
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // normalise to [2^63, 2^64)
    let mut r = if msb >= 64 {
        sqrt_price >> (msb - 63)
    } else {
        sqrt_price << (63 - msb)
    };

    let mut bit: i128 = 1 << 63;
    let mut log2p_fraction_x64: i128 = 0;
    for _ in 0..14 {
        r *= r;
        let is_r_more_than_two = (r >> 127) as u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
    }

    let log2p_x32 = log2p_integer_x32 + (log2p_fraction_x64 >> 32);
    let logbp_x64 = log2p_x32 * 59_543_866_431_248;

    let tick_low = ((logbp_x64 - 184_467_440_737_095_516) >> 64) as i32;
    let tick_high = ((logbp_x64 + 15_793_534_762_490_258_745) >> 64) as i32;

    if tick_low == tick_high || tick_index_to_sqrt_price(tick_high)? > sqrt_price {
        Ok(tick_low)
    } else {
        Ok(tick_high)
    }
}

/// Q64.64 square root of a human readable price of token A quoted in token B.
pub fn price_to_sqrt_price(price: f64, decimals_a: u8, decimals_b: u8) -> u128 {
    let power = 10f64.powi(decimals_a as i32 - decimals_b as i32);
    ((price / power).sqrt() * Q64 as f64).floor() as u128
}

pub fn sqrt_price_to_price(sqrt_price: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let power = 10f64.powi(decimals_a as i32 - decimals_b as i32);
    let sqrt = sqrt_price as f64 / Q64 as f64;
    sqrt * sqrt * power
}

pub fn price_to_tick_index(price: f64, decimals_a: u8, decimals_b: u8) -> Result<i32> {
    sqrt_price_to_tick_index(price_to_sqrt_price(price, decimals_a, decimals_b))
}

pub fn tick_index_to_price(tick_index: i32, decimals_a: u8, decimals_b: u8) -> Result<f64> {
    Ok(sqrt_price_to_price(
        tick_index_to_sqrt_price(tick_index)?,
        decimals_a,
        decimals_b,
    ))
}

/// Snaps `tick_index` onto a multiple of `tick_spacing`.
///
/// `None` rounds to the nearest multiple (half rounds up), `Some(true)` forces rounding up
/// and `Some(false)` forces rounding down.
pub fn get_initializable_tick_index(tick_index: i32, tick_spacing: u16, round_up: Option<bool>) -> i32 {
    let tick_spacing = tick_spacing as i32;
    let remainder = tick_index.rem_euclid(tick_spacing);
    let result = tick_index.div_euclid(tick_spacing) * tick_spacing;

    let should_round_up = match round_up {
        Some(round_up) => round_up && remainder > 0,
        None => remainder > 0 && remainder >= tick_spacing / 2,
    };

    if should_round_up {
        result + tick_spacing
    } else {
        result
    }
}

pub fn get_next_initializable_tick_index(tick_index: i32, tick_spacing: u16) -> i32 {
    get_initializable_tick_index(tick_index, tick_spacing, Some(false)) + tick_spacing as i32
}

pub fn get_prev_initializable_tick_index(tick_index: i32, tick_spacing: u16) -> i32 {
    get_initializable_tick_index(tick_index, tick_spacing, Some(true)) - tick_spacing as i32
}

pub fn get_tick_array_start_tick_index(tick_index: i32, tick_spacing: u16) -> i32 {
    let ticks_in_array = TICK_ARRAY_SIZE as i32 * tick_spacing as i32;
    tick_index.div_euclid(ticks_in_array) * ticks_in_array
}

/// Position of `tick_index` inside the tick array starting at `tick_array_start_index`.
pub fn get_tick_index_in_array(
    tick_index: i32,
    tick_array_start_index: i32,
    tick_spacing: u16,
) -> Result<usize> {
    let offset = tick_index - tick_array_start_index;
    let ticks_in_array = TICK_ARRAY_SIZE as i32 * tick_spacing as i32;
    if offset < 0 || offset >= ticks_in_array {
        return Err(WhirlpoolError::TickNotFound.into());
    }
    Ok((offset / tick_spacing as i32) as usize)
}

pub fn get_full_range_tick_indexes(tick_spacing: u16) -> (i32, i32) {
    let tick_spacing = tick_spacing as i32;
    (
        (MIN_TICK_INDEX / tick_spacing) * tick_spacing,
        (MAX_TICK_INDEX / tick_spacing) * tick_spacing,
    )
}

pub fn order_tick_indexes(tick_index_1: i32, tick_index_2: i32) -> (i32, i32) {
    if tick_index_1 < tick_index_2 {
        (tick_index_1, tick_index_2)
    } else {
        (tick_index_2, tick_index_1)
    }
}

pub fn is_full_range_only(tick_spacing: u16) -> bool {
    tick_spacing >= FULL_RANGE_ONLY_TICK_SPACING_THRESHOLD
}
