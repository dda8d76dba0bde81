use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel is not open")]
    NotConnected,
    #[error("transport has been shut down")]
    Shutdown,
    #[error("failed to open serial port {port}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to list serial ports")]
    List(#[source] serialport::Error),
    #[error("failed to start transport runtime")]
    Runtime(#[source] std::io::Error),
}
