//! Binary graph snapshots
//!
//! Layout: a bincode-encoded [`SnapshotHeader`] followed by the
//! bincode-encoded [`GraphView`]. The view is re-validated on load.

use crate::error::{PargraphError, PargraphResult};
use pargraph_algorithms::GraphView;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

const MAGIC: [u8; 8] = *b"PARGRAPH";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotHeader {
    magic: [u8; 8],
    version: u32,
}

/// Encode `view` into `writer`.
pub fn write_snapshot<W: Write>(view: &GraphView, writer: &mut W) -> PargraphResult<()> {
    let header = SnapshotHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
    };
    bincode::serialize_into(&mut *writer, &header)?;
    bincode::serialize_into(&mut *writer, view)?;
    Ok(())
}

/// Decode a snapshot, rejecting foreign or structurally invalid data.
pub fn read_snapshot<R: Read>(mut reader: R) -> PargraphResult<GraphView> {
    let header: SnapshotHeader = bincode::deserialize_from(&mut reader)?;
    if header.magic != MAGIC {
        return Err(PargraphError::Format("not a pargraph snapshot".to_string()));
    }
    if header.version != FORMAT_VERSION {
        return Err(PargraphError::Format(format!(
            "unsupported snapshot version {} (expected {FORMAT_VERSION})",
            header.version
        )));
    }

    let view: GraphView = bincode::deserialize_from(&mut reader)?;
    view.validate()?;
    Ok(view)
}
