use std::time::{Duration, Instant};

/// 各阶段耗时统计，按阶段进入顺序记录
pub struct TimingScope {
    start_time: Instant,
    current: Option<(String, Instant)>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            current: None,
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时，同时结束上一个阶段
    pub fn start_phase(&mut self, phase_name: &str) {
        self.end_phase();
        self.current = Some((phase_name.to_string(), Instant::now()));
    }

    /// 结束当前阶段的计时
    pub fn end_phase(&mut self) -> Option<Duration> {
        let (phase_name, started) = self.current.take()?;
        let duration = started.elapsed();
        self.phase_durations.push((phase_name, duration));
        Some(duration)
    }

    pub fn phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.start_time.elapsed().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}
