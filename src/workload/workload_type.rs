//! Benchmark selection

/// Benchmarks this tool can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadType {
    /// Deferred increments on an event loop
    Latency,
    /// CPU-bound tasks across parallel workers
    Throughput,
}

impl WorkloadType {
    /// Parse workload type from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "latency" | "event-loop" | "event_loop" => Some(Self::Latency),
            "throughput" | "cpu" | "parallel" => Some(Self::Throughput),
            _ => None,
        }
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "LATENCY",
            Self::Throughput => "THROUGHPUT",
        }
    }
}

impl std::fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workload_types() {
        assert_eq!(WorkloadType::parse("latency"), Some(WorkloadType::Latency));
        assert_eq!(WorkloadType::parse("LATENCY"), Some(WorkloadType::Latency));
        assert_eq!(WorkloadType::parse("event-loop"), Some(WorkloadType::Latency));
        assert_eq!(WorkloadType::parse(" throughput "), Some(WorkloadType::Throughput));
        assert_eq!(WorkloadType::parse("unknown"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkloadType::Throughput.to_string(), "THROUGHPUT");
    }
}
