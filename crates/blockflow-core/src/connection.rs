use crate::BlockId;

/// Port index reserved for the stack edge on both ends of a link.
pub const PRIMARY_PORT: u16 = 1;

/// Directed edge between block ports. Ports are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub source: BlockId,
    pub source_port: u16,
    pub target: BlockId,
    pub target_port: u16,
}

impl Connection {
    pub fn new(source: BlockId, source_port: u16, target: BlockId, target_port: u16) -> Self {
        Self {
            source,
            source_port,
            target,
            target_port,
        }
    }

    /// Edge recorded for `target` stacked directly below `source`.
    pub fn stack(source: BlockId, target: BlockId) -> Self {
        Self::new(source, PRIMARY_PORT, target, PRIMARY_PORT)
    }

    /// Edge recorded for `target` heading arm `arm` of `c_block`.
    pub fn arm(c_block: BlockId, arm: usize, target: BlockId) -> Self {
        Self::new(c_block, arm_port(arm), target, PRIMARY_PORT)
    }

    pub fn touches(&self, id: BlockId) -> bool {
        self.source == id || self.target == id
    }

    /// Arm index this edge would fill if it leaves a C-block.
    pub fn arm_index(&self) -> Option<usize> {
        (self.source_port > PRIMARY_PORT).then(|| usize::from(self.source_port - 2))
    }

    pub fn output_name(&self) -> String {
        output_port_name(self.source_port)
    }

    pub fn input_name(&self) -> String {
        input_port_name(self.target_port)
    }
}

/// Output port that carries arm `arm` of a C-block.
pub fn arm_port(arm: usize) -> u16 {
    u16::try_from(arm + 2).unwrap_or(u16::MAX)
}

pub fn output_port_name(port: u16) -> String {
    format!("output_{port}")
}

pub fn input_port_name(port: u16) -> String {
    format!("input_{port}")
}

/// Parses `output_3` / `input_1` style names, or a bare number.
pub fn parse_port(name: &str) -> Option<u16> {
    let digits = name
        .strip_prefix("output_")
        .or_else(|| name.strip_prefix("input_"))
        .unwrap_or(name);
    digits.parse().ok().filter(|port| *port > 0)
}
