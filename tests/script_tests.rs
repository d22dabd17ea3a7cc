mod common;

#[cfg(test)]
mod tests {
    use crate::common::{fixture, run_to_end, Run};
    use framestep::policy::{AlwaysDelay, NeverDelay, SwapRules, Version};
    use framestep::scheduler::{SchedulerConfig, SchedulerError, SchedulerState, StepController, Tick};
    use framestep::script::Script;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn controller(config: &str, rules: &str) -> StepController<Value> {
        let config = match config {
            "" => SchedulerConfig::default(),
            name => SchedulerConfig::from_path(fixture(name)).unwrap(),
        };
        let rules = match rules {
            "" => SwapRules::new(),
            name => SwapRules::from_path(fixture(name)).unwrap(),
        };
        StepController::with_config(config).with_policy(rules)
    }

    // Timeline of intro.json: intro waits 2, calls fade (wait 1, signal),
    // then signals itself. Each delayed swap pushes everything after it back
    // by one tick.
    #[rstest]
    #[case::no_rules("", "", 8, 6, 7)]
    #[case::legacy_rules("", "legacy_rules.json", 9, 7, 8)]
    #[case::forced_delay("strict.json", "", 10, 7, 9)]
    #[case::forced_delay_with_rules("strict.json", "legacy_rules.json", 10, 7, 9)]
    fn intro_timeline(
        #[case] config: &str,
        #[case] rules: &str,
        #[case] finished_at: u32,
        #[case] faded_at: u32,
        #[case] done_at: u32,
    ) {
        let script = Script::from_path(fixture("intro.json")).unwrap();
        let mut ctl = controller(config, rules);
        ctl.push(script.frame()).unwrap();

        let run = run_to_end(&mut ctl, 50);
        assert_eq!(
            run,
            Run {
                finished_at,
                signals: vec![
                    (faded_at, json!({ "event": "faded" })),
                    (done_at, json!({ "event": "intro-done" })),
                ],
            }
        );
    }

    #[test]
    fn nested_calls_collapse_without_delay() {
        let script = Script::from_path(fixture("nested_calls.json")).unwrap();
        let mut ctl = StepController::new().with_policy(NeverDelay);
        ctl.push(script.frame()).unwrap();

        match ctl.update().unwrap() {
            Tick::Signalled { signal, report } => {
                assert_eq!(signal, json!("back"));
                assert_eq!(report.steps, 5);
                assert_eq!(report.swaps, 4);
            }
            other => panic!("expected signal on first tick, got {:?}", other),
        }
        ctl.update().unwrap();
        assert!(ctl.is_finished());
    }

    #[test]
    fn nested_calls_one_tick_per_swap_with_delay() {
        let script = Script::from_path(fixture("nested_calls.json")).unwrap();
        let mut ctl = StepController::new().with_policy(AlwaysDelay);
        ctl.push(script.frame()).unwrap();

        let run = run_to_end(&mut ctl, 20);
        assert_eq!(run.signals, vec![(5, json!("back"))]);
        assert_eq!(run.finished_at, 6);
    }

    #[test]
    fn peek_follows_nesting() {
        let script = Script::from_path(fixture("nested_calls.json")).unwrap();
        let mut ctl = StepController::new().with_policy(AlwaysDelay);
        ctl.push(script.frame()).unwrap();

        let mut tops = Vec::new();
        for _ in 0..4 {
            ctl.update().unwrap();
            tops.push(ctl.peek().map(|f| f.name.to_string()).unwrap_or_default());
        }
        assert_eq!(tops, vec!["middle", "inner", "middle", "outer"]);
        assert_eq!(ctl.frames().len(), 1);
    }

    #[test]
    fn invalid_wait_halts_until_reset() {
        let script = Script::from_path(fixture("bad_wait.json")).unwrap();
        let mut ctl: StepController<Value> = StepController::new();
        ctl.push(script.frame()).unwrap();

        let err = ctl.update().unwrap_err();
        assert!(matches!(err, SchedulerError::ProtocolViolation(_)));
        assert!(err.to_string().contains("broken"));
        assert_eq!(ctl.update(), Ok(Tick::Halted));
        assert_eq!(ctl.state(), SchedulerState::Halted);

        ctl.reset();
        assert_eq!(ctl.update(), Ok(Tick::Idle));
    }

    #[test]
    fn strict_config_bounds_depth() {
        let mut script = Script::new("leaf", vec![]);
        for i in 0..20 {
            script = Script::new(format!("level{}", i), vec![framestep::script::ScriptStep::call(script)]);
        }
        let mut ctl = controller("strict.json", "");
        ctl.set_force_delayed_swap(false);
        ctl.push(script.frame()).unwrap();

        let err = ctl.update().unwrap_err();
        assert_eq!(err, SchedulerError::NestingTooDeep { depth: 17 });
    }

    #[test]
    fn legacy_preset_matches_fixture() {
        let from_file = SwapRules::from_path(fixture("legacy_rules.json")).unwrap();
        let preset = SwapRules::legacy("host", Version::new(1, 2563, 0))
            .producer("speedrun-tools", Version::new(1, 3000, 0))
            .producer("old-helper", Version::new(1, 1200, 0));
        assert_eq!(from_file, preset);
    }
}
