#[derive(Copy, Clone, Debug, Default)]
pub struct TickStats {
    pub events_applied: u32,
    pub grabs_active: u32,
    pub springs_solved: u32,
    pub braking: bool,
}
