//! GPIO / peripheral pin assignments for the PrintLock sensor board.
//!
//! Single source of truth — every adapter references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Pattern sensor head
// ---------------------------------------------------------------------------

/// Digital input: presence detect line (active HIGH when a subject is
/// positioned on the sensor).  Internal pull-up enabled.
pub const PRESENCE_GPIO: i32 = 10;

/// Digital inputs: seven feature lines, bit 0 first.  Read together they
/// form the 7-bit pattern value.  Internal pull-ups enabled.
pub const FEATURE_GPIOS: [i32; 7] = [1, 2, 3, 4, 5, 6, 7];

// ---------------------------------------------------------------------------
// Command console UART
// ---------------------------------------------------------------------------

/// UART TX line for command replies.
pub const UART_TX_GPIO: i32 = 21;

/// UART RX line for incoming command bytes.
pub const UART_RX_GPIO: i32 = 20;
