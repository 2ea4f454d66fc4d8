//! Host UART transmit task
//!
//! Writes queued feedback and alarm lines to the CNC host, one per line
//! with CRLF endings.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use crate::channels::HOST_CHANNEL;

/// Longest host line, including CRLF
const MAX_LINE_LEN: usize = 64;

/// Host TX task - drains the host channel to the UART
#[embassy_executor::task]
pub async fn host_tx_task(mut tx: BufferedUartTx) {
    info!("Host TX task started");

    loop {
        let line = HOST_CHANNEL.receive().await;

        let mut buf: String<MAX_LINE_LEN> = String::new();
        if write!(buf, "{}\r\n", line).is_err() {
            warn!("Host line too long: {:?}", line);
            continue;
        }

        if let Err(e) = tx.write_all(buf.as_bytes()).await {
            warn!("Failed to send host line: {:?}", Debug2Format(&e));
        } else {
            trace!("Sent {}", buf.as_str());
        }
    }
}
