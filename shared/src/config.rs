use crate::calendar::VotingCycle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub cycle: VotingCycle,
    /// Drop a toggle while another one for the same date is still in flight.
    /// With this off, both requests run and the last response wins.
    pub serialize_same_date: bool,
}

impl SyncConfig {
    pub fn for_year(year: i32) -> Self {
        Self {
            cycle: VotingCycle::for_year(year),
            serialize_same_date: true,
        }
    }
}
