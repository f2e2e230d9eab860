pub mod io {
    pub(crate) use tokio::io::AsyncWriteExt as WriteExt;

    #[cfg(feature = "smtp")]
    pub(crate) use tokio::io::{
        join, AsyncBufRead as BufRead, AsyncWrite as Write, BufStream,
    };
}

#[cfg(feature = "smtp")]
pub mod net {
    pub(crate) use tokio::net::TcpStream;
}

pub mod process {
    pub(crate) use tokio::process::{Child, Command};
}

pub mod fs {
    pub(crate) use tokio::fs::read;
}

pub mod sync {
    pub(crate) use tokio::sync::Mutex;
}
