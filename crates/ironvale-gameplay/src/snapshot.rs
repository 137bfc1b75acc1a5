//! Binary snapshots of a running simulation.
//!
//! Layout: 4 magic bytes, 6 schema-version bytes, then a bincode payload of
//! the simulation and the player pose. Pending bus events are not included.

use ironvale_common::{MagicBytes, SchemaVersion, SnapshotError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::player::PlayerPose;
use crate::rng::RandomSource;
use crate::simulation::Simulation;

const HEADER_LEN: usize = 10;

impl<R> Simulation<R>
where
    R: RandomSource + Serialize + DeserializeOwned,
{
    /// Encodes the simulation and `player` into a snapshot.
    pub fn snapshot(&self, player: &PlayerPose) -> Result<Vec<u8>, SnapshotError> {
        let payload = bincode::serialize(&(self, player))
            .map_err(|e| SnapshotError::Encode(e.to_string()))?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&MagicBytes::SNAPSHOT.0);
        bytes.extend_from_slice(&SchemaVersion::SIMULATION_SNAPSHOT.to_bytes());
        bytes.extend_from_slice(&payload);
        debug!(tick = self.current_tick(), bytes = bytes.len(), "snapshot taken");
        Ok(bytes)
    }

    /// Rebuilds a simulation and player pose from a snapshot.
    pub fn restore(bytes: &[u8]) -> Result<(Self, PlayerPose), SnapshotError> {
        if bytes.len() < HEADER_LEN || bytes[..4] != MagicBytes::SNAPSHOT.0 {
            return Err(SnapshotError::BadMagic);
        }
        let mut version_bytes = [0u8; 6];
        version_bytes.copy_from_slice(&bytes[4..HEADER_LEN]);
        let version = SchemaVersion::from_bytes(version_bytes);
        if !SchemaVersion::SIMULATION_SNAPSHOT.can_read(&version) {
            return Err(SnapshotError::VersionMismatch {
                expected: SchemaVersion::SIMULATION_SNAPSHOT.to_string(),
                actual: version.to_string(),
            });
        }
        let (simulation, player): (Self, PlayerPose) = bincode::deserialize(&bytes[HEADER_LEN..])?;
        debug!(tick = simulation.current_tick(), "snapshot restored");
        Ok((simulation, player))
    }
}
