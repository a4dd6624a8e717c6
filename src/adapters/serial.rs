//! Command console adapter.
//!
//! TX side implements [`ReplyPort`]; RX side runs in its own thread (the
//! asynchronous receive context), feeding every byte through a
//! [`LineAssembler`] and publishing completed lines to the shared
//! [`LineMailbox`].  On ESP-IDF this wraps the UART driver; on the host,
//! stdin/stdout stand in so the whole firmware runs as a console demo.

use crate::rx::LineMailbox;

#[cfg(target_os = "espidf")]
pub use esp_impl::{split_uart, UartConsole};

#[cfg(not(target_os = "espidf"))]
pub use host::{spawn_stdin_reader, HostConsole};

// ── ESP-IDF UART ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_hal::delay::BLOCK;
    use esp_idf_hal::uart::{UartDriver, UartTxDriver};
    use log::warn;

    use super::LineMailbox;
    use crate::app::ports::ReplyPort;
    use crate::rx::LineAssembler;

    /// TX half of the command UART.
    pub struct UartConsole {
        tx: UartTxDriver<'static>,
    }

    impl UartConsole {
        fn write_all(&mut self, mut bytes: &[u8]) {
            while !bytes.is_empty() {
                match self.tx.write(bytes) {
                    Ok(written) => bytes = &bytes[written..],
                    Err(e) => {
                        warn!("console: UART write failed ({e})");
                        return;
                    }
                }
            }
        }
    }

    impl ReplyPort for UartConsole {
        fn send_line(&mut self, line: &str) {
            self.write_all(line.as_bytes());
            self.write_all(b"\r\n");
        }
    }

    /// Split the UART and start the RX thread.
    ///
    /// The returned console owns the TX half; the RX half moves into a
    /// dedicated reader thread that blocks on the driver's byte queue and
    /// publishes completed lines to `mailbox`.
    pub fn split_uart(uart: UartDriver<'static>, mailbox: &'static LineMailbox) -> UartConsole {
        let (tx, rx) = uart.into_split();

        let builder = std::thread::Builder::new().name("uart_rx".into());
        let spawned = builder.spawn(move || {
            let mut rx = rx;
            let mut assembler = LineAssembler::new();
            let mut byte = [0u8; 1];
            loop {
                match rx.read(&mut byte, BLOCK) {
                    Ok(1) => {
                        if let Some(line) = assembler.push_byte(byte[0]) {
                            mailbox.publish(line);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("console: UART read failed ({e})");
                        std::thread::sleep(std::time::Duration::from_millis(10));
                    }
                }
            }
        });
        if let Err(e) = spawned {
            warn!("console: failed to spawn RX thread ({e})");
        }

        UartConsole { tx }
    }
}

// ── Host stdin/stdout ─────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{Read, Write};

    use log::warn;

    use super::LineMailbox;
    use crate::app::ports::ReplyPort;
    use crate::rx::LineAssembler;

    /// Host stand-in for the command UART TX half.
    pub struct HostConsole;

    impl ReplyPort for HostConsole {
        fn send_line(&mut self, line: &str) {
            let mut out = std::io::stdout();
            let result = out
                .write_all(line.as_bytes())
                .and_then(|()| out.write_all(b"\r\n"))
                .and_then(|()| out.flush());
            if result.is_err() {
                warn!("console: stdout write failed");
            }
        }
    }

    /// Read stdin byte-by-byte in a background thread, mirroring the
    /// device's asynchronous RX context.
    pub fn spawn_stdin_reader(mailbox: &'static LineMailbox) {
        std::thread::spawn(move || {
            let mut assembler = LineAssembler::new();
            for byte in std::io::stdin().bytes() {
                let Ok(b) = byte else { break };
                if let Some(line) = assembler.push_byte(b) {
                    mailbox.publish(line);
                }
            }
        });
    }
}
