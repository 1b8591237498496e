/// これより膝が伸びていれば立位（度）
pub const STANDING_KNEE_ANGLE: f32 = 160.0;
/// これより膝が曲がっていればボトム（度）
pub const BOTTOM_KNEE_ANGLE: f32 = 100.0;

/// 反復回数カウンタ
///
/// 左右平均の膝角度で駆動する。ボトムまで曲げてから立位に戻ったら1回。
/// 無効フレームは入力しないので、途中で姿勢を見失っても進行は保持される。
#[derive(Debug, Clone, Default)]
pub struct RepCounter {
    reached_bottom: bool,
    count: u32,
}

impl RepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 膝角度を入力し、1回完了したら true を返す
    pub fn update(&mut self, knee_angle: f32) -> bool {
        if knee_angle < BOTTOM_KNEE_ANGLE {
            self.reached_bottom = true;
            false
        } else if knee_angle > STANDING_KNEE_ANGLE && self.reached_bottom {
            self.reached_bottom = false;
            self.count += 1;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(counter: &mut RepCounter, angles: &[f32]) -> Vec<bool> {
        angles.iter().map(|&a| counter.update(a)).collect()
    }

    #[test]
    fn test_counts_full_cycle() {
        let mut counter = RepCounter::new();
        let done = feed(&mut counter, &[175.0, 140.0, 95.0, 85.0, 130.0, 170.0]);
        assert_eq!(done, vec![false, false, false, false, false, true]);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_shallow_dip_not_counted() {
        let mut counter = RepCounter::new();
        feed(&mut counter, &[175.0, 120.0, 105.0, 150.0, 175.0]);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let mut counter = RepCounter::new();
        feed(&mut counter, &[100.0, 170.0]);
        assert_eq!(counter.count(), 0);

        feed(&mut counter, &[99.0, 160.0]);
        assert_eq!(counter.count(), 0);
        assert!(counter.update(160.5));
    }

    #[test]
    fn test_staying_upright_counts_once() {
        let mut counter = RepCounter::new();
        feed(&mut counter, &[90.0, 170.0, 175.0, 178.0]);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_multiple_reps() {
        let mut counter = RepCounter::new();
        for _ in 0..3 {
            feed(&mut counter, &[175.0, 130.0, 80.0, 130.0, 175.0]);
        }
        assert_eq!(counter.count(), 3);
    }
}
