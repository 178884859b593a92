use foundation::Chamber;

/// Identifies an in-flight boundary load.
///
/// Small and copyable so it can travel with the fetch future. The epoch
/// advances each time the active chamber changes; a ticket from an older
/// epoch is stale no matter when its fetch completes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket {
    pub epoch: u64,
    pub chamber: Chamber,
}
