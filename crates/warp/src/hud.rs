//! Window-title HUD.

use field::FieldStats;
use procgen::format_count;

/// One-line summary shown after the window title.
pub fn status_line(stats: &FieldStats, fps: f32) -> String {
    format!(
        "seed {:08X} | speed {:.2} -> {:.2} {} | {} billboards | {} particles | #{} | {} ({} combos) | {:.0} fps",
        stats.seed,
        stats.current_speed,
        stats.target_speed,
        stats.direction.name(),
        stats.billboards,
        stats.active_particles,
        stats.next_index,
        stats.profile.name,
        format_count(stats.profile.combinations),
        fps
    )
}

pub fn window_title(base: &str, stats: Option<&FieldStats>, fps: f32, show: bool) -> String {
    match stats {
        Some(stats) if show => format!("{} | {}", base, status_line(stats, fps)),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::Direction;
    use procgen::ProfileStats;

    fn stats() -> FieldStats {
        FieldStats {
            seed: 0xBEEF,
            next_index: 42,
            current_speed: 1.0,
            target_speed: 1.1,
            direction: Direction::Backward,
            billboards: 30,
            active_particles: 1000,
            recycled: 12,
            profile: ProfileStats {
                name: "Classic".into(),
                templates: 8,
                pools: 5,
                combinations: 5_597_577_216,
            },
        }
    }

    #[test]
    fn status_line_shows_hex_seed_and_grouped_combinations() {
        let line = status_line(&stats(), 59.6);
        assert!(line.starts_with("seed 0000BEEF"));
        assert!(line.contains("1.00 -> 1.10 backward"));
        assert!(line.contains("5,597,577,216 combos"));
        assert!(line.ends_with("60 fps"));
    }

    #[test]
    fn hidden_hud_leaves_plain_title() {
        assert_eq!(window_title("Warp", Some(&stats()), 60.0, false), "Warp");
        assert_eq!(window_title("Warp", None, 60.0, true), "Warp");
        assert!(window_title("Warp", Some(&stats()), 60.0, true).starts_with("Warp | seed"));
    }
}
