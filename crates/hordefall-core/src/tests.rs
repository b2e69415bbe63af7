#[cfg(test)]
mod tests {
    use crate::commands::GameCommand;
    use crate::config::{default_enemy_roster, default_upgrade_pool, RuntimeConfig};
    use crate::enums::*;
    use crate::events::GameEvent;
    use crate::state::RunSnapshot;
    use crate::types::GameTime;

    /// Verify all enums round-trip through serde_json.
    #[test]
    fn test_tier_serde() {
        for v in Tier::ALL {
            let json = serde_json::to_string(&v).unwrap();
            let back: Tier = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_upgrade_kind_serde() {
        let variants = vec![
            UpgradeKind::Damage,
            UpgradeKind::AttackSpeed,
            UpgradeKind::MoveSpeed,
            UpgradeKind::MaxHealth,
            UpgradeKind::ExperienceGain,
            UpgradeKind::PickupRadius,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: UpgradeKind = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_screen_id_serde() {
        let variants = vec![
            ScreenId::MainMenu,
            ScreenId::Hud,
            ScreenId::UpgradeSelection,
            ScreenId::GameOver,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: ScreenId = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_phase_serde() {
        let variants = vec![Phase::Boot, Phase::Menu, Phase::Playing, Phase::GameOver];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: Phase = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    /// Verify GameCommand round-trips through serde (tagged union).
    #[test]
    fn test_game_command_serde() {
        let commands = vec![
            GameCommand::StartRun,
            GameCommand::EndRun,
            GameCommand::ReturnToMenu,
            GameCommand::RestartSystems,
            GameCommand::ReportKill {
                enemy_id: "shambler".to_string(),
            },
            GameCommand::SelectUpgrade { index: 1 },
            GameCommand::SetTimeScale { scale: 2.0 },
            GameCommand::GrantExperience { amount: 120 },
            GameCommand::GrantScore { points: 50 },
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: GameCommand = serde_json::from_str(&json).unwrap();
            // Compare JSON representations since GameCommand doesn't derive PartialEq
            assert_eq!(json, serde_json::to_string(&back).unwrap());
        }
    }

    /// Verify GameEvent round-trips through serde.
    #[test]
    fn test_game_event_serde() {
        let events = vec![
            GameEvent::ScoreChanged { score: 1200 },
            GameEvent::ExperienceGained {
                amount: 18,
                total: 58,
            },
            GameEvent::LevelUp { level: 3 },
            GameEvent::UpgradeOffered { count: 3 },
            GameEvent::UpgradeApplied {
                upgrade_id: "sharpened_edge".to_string(),
                new_level: 2,
            },
            GameEvent::GamePaused,
            GameEvent::GameResumed,
            GameEvent::WaveAdvanced { wave: 4 },
            GameEvent::EnemySpawned {
                enemy_id: "runner".to_string(),
            },
            GameEvent::HapticPulse,
        ];
        for event in &events {
            let json = serde_json::to_string(event).unwrap();
            let _back: GameEvent = serde_json::from_str(&json).unwrap();
        }
    }

    /// Verify RunSnapshot can be serialized to JSON.
    #[test]
    fn test_snapshot_serde() {
        let snapshot = RunSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: RunSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.time.tick, back.time.tick);
        assert_eq!(snapshot.phase, back.phase);
        // Verify the default snapshot is reasonably small
        assert!(
            json.len() < 1024,
            "Empty snapshot should be <1KB, was {} bytes",
            json.len()
        );
    }

    /// Verify GameTime advancement at full and zero time scale.
    #[test]
    fn test_game_time_advance() {
        let mut time = GameTime::default();
        assert_eq!(time.tick, 0);

        for _ in 0..60 {
            time.advance(crate::constants::DT, 1.0);
        }
        assert_eq!(time.tick, 60);
        // 60 ticks at 60Hz = 1 second, scaled and unscaled
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
        assert!((time.real_elapsed_secs - 1.0).abs() < 1e-9);

        // At time scale zero, unscaled time keeps running and scaled stops
        for _ in 0..60 {
            time.advance(crate::constants::DT, 0.0);
        }
        assert_eq!(time.tick, 120);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
        assert!((time.real_elapsed_secs - 2.0).abs() < 1e-9);
        assert_eq!(time.delta, 0.0);
        assert!(time.real_delta > 0.0);
    }

    /// Default content passes basic shape checks.
    #[test]
    fn test_default_content() {
        let roster = default_enemy_roster();
        assert_eq!(roster.len(), 10);
        assert!(roster.iter().all(|e| !e.enemy_id.is_empty()));
        assert!(roster.iter().all(|e| e.difficulty_value > 0.0 && e.max_health > 0.0));
        assert!(roster.iter().all(|e| e.min_wave_number >= 1));

        let pool = default_upgrade_pool();
        assert_eq!(pool.len(), 6);
        assert!(pool.iter().all(|u| u.max_level >= 1));

        let config = RuntimeConfig::default();
        assert_eq!(config.upgrade_offer_count, 3);
        assert!((config.resume_delay_secs - 0.3).abs() < 1e-9);
        assert!((config.database_wait_timeout_secs - 10.0).abs() < 1e-9);
    }
}
