use aero_agent::{ShiftWindow, Task};
use aero_core::{Cell, UniformRange};
use aero_epi::intervention::{Interventions, TestPolicy, VaccinePolicy};
use aero_grid::ObstructionGrid;

use crate::config::{CrewSpec, ModelConfig};
use crate::gathering::Gathering;
use crate::model::Model;

fn full_day_shift() -> ShiftWindow {
    ShiftWindow::new(0, 8 * 3_600)
}

fn station_crew(size: u32, cells: &[(u16, u16)]) -> CrewSpec {
    let n = cells.len();
    let tasks: Vec<Task> = cells
        .iter()
        .map(|&(r, c)| Task::new(Cell::new(r, c), 5, 1.0 / n as f64).unwrap())
        .collect();
    CrewSpec::new(size, tasks, full_day_shift())
}

fn open_model(rows: usize, cols: usize, config: ModelConfig) -> Model {
    let grid = ObstructionGrid::open(rows, cols).unwrap();
    Model::new(&grid, config, Interventions::none()).unwrap()
}

mod config {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_workdays_rejected() {
        let config = ModelConfig { workdays_per_week: 0, ..ModelConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn time_step_must_divide_day_and_workday() {
        let config = ModelConfig { time_step_secs: 7, ..ModelConfig::default() };
        assert!(config.validate().is_err());
        let config = ModelConfig { time_step_secs: 0, ..ModelConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn misaligned_shift_rejected_at_crew_add() {
        let mut model = open_model(2, 2, ModelConfig::default());
        let tasks = vec![Task::new(Cell::new(0, 0), 5, 1.0).unwrap()];
        // 90s offset on a 60s step.
        let crew = CrewSpec::new(1, tasks, ShiftWindow::new(90, 3_600));
        assert!(model.add_crew(&crew).is_err());
    }

    #[test]
    fn out_of_grid_isolation_cell_rejected() {
        let grid = ObstructionGrid::open(2, 2).unwrap();
        let config = ModelConfig {
            isolation_cell: Some(Cell::new(5, 5)),
            ..ModelConfig::default()
        };
        assert!(Model::new(&grid, config, Interventions::none()).is_err());
    }
}

mod infection {
    use super::*;

    #[test]
    fn full_initial_infection_rate_infects_everyone() {
        let config = ModelConfig { infection_rate: 1.0, ..ModelConfig::default() };
        let mut model = open_model(3, 3, config);
        model.add_crew(&station_crew(5, &[(0, 0), (2, 2)])).unwrap();

        assert!(model.agents().iter().all(|a| !a.epi().healthy));
        let start = model.clock().start_date();
        assert_eq!(model.daily_report().count_on(start), 5);
        assert_eq!(model.attack_rate().0, 100.0);
    }

    #[test]
    fn no_carriers_means_no_infections() {
        let config = ModelConfig { time_step_secs: 3_600, ..ModelConfig::default() };
        let mut model = open_model(3, 3, config);
        model.add_crew(&station_crew(4, &[(0, 0), (1, 2)])).unwrap();
        model.run_steps(30); // past several day boundaries
        assert_eq!(model.daily_report().total(), 0);
        assert!(model.agents().iter().all(|a| a.epi().healthy));
    }

    #[test]
    fn offsite_rate_infects_at_the_day_boundary_backdated() {
        let config = ModelConfig {
            time_step_secs: 3_600,
            offsite_infection_rate: 1.0,
            ..ModelConfig::default()
        };
        let mut model = open_model(3, 3, config);
        model.add_crew(&station_crew(4, &[(0, 0)])).unwrap();
        model.run_steps(12); // crosses the first day boundary
        assert!(model.agents().iter().all(|a| !a.epi().healthy));
        // Exposure belongs to the day before the boundary.
        let start = model.clock().start_date();
        assert_eq!(model.daily_report().count_on(start), 4);
    }

    #[test]
    fn full_immunity_vaccine_blocks_offsite_infection() {
        let grid = ObstructionGrid::open(3, 3).unwrap();
        let config = ModelConfig {
            time_step_secs: 3_600,
            offsite_infection_rate: 1.0,
            ..ModelConfig::default()
        };
        let interventions = Interventions {
            vaccine: Some(VaccinePolicy {
                efficacy_pct: UniformRange::fixed(100.0).unwrap(),
                compliance_pct: 100.0,
            }),
            ..Interventions::none()
        };
        let mut model = Model::new(&grid, config, interventions).unwrap();
        model.add_crew(&station_crew(4, &[(0, 0)])).unwrap();
        model.run_steps(30);
        assert!(model.agents().iter().all(|a| a.epi().vaccinated));
        assert!(model.agents().iter().all(|a| a.epi().healthy));
        assert_eq!(model.daily_report().total(), 0);
    }
}

mod field {
    use super::*;

    #[test]
    fn zero_ventilation_keeps_quanta_at_origin() {
        let config = ModelConfig {
            ventilation_efficiency: 0.0,
            infection_rate: 1.0,
            ..ModelConfig::default()
        };
        let mut model = open_model(2, 2, config);
        model.add_crew(&station_crew(1, &[(0, 0)])).unwrap();
        model.run_steps(30); // well inside the first workday

        assert!(model.field().total_at(Cell::new(0, 0)) > 0.0);
        assert_eq!(model.field().total_at(Cell::new(0, 1)), 0.0);
        assert_eq!(model.field().total_at(Cell::new(1, 0)), 0.0);
        assert_eq!(model.field().total_at(Cell::new(1, 1)), 0.0);
    }

    #[test]
    fn walled_off_region_stays_clean() {
        // Column 2 is sealed behind right-face walls; the isolation cell
        // (bottom-right default) lives in it.
        let grid = ObstructionGrid::from_rows(vec![vec![0, 3, 0], vec![0, 2, 0]]).unwrap();
        let config = ModelConfig { infection_rate: 1.0, ..ModelConfig::default() };
        let mut model = Model::new(&grid, config, Interventions::none()).unwrap();
        let mut crew = station_crew(3, &[(0, 0), (1, 0)]);
        crew.tasks = vec![
            Task::new(Cell::new(0, 0), 5, 0.5).unwrap(),
            Task::new(Cell::new(1, 0), 5, 0.5).unwrap(),
        ];
        model.add_crew(&crew).unwrap();
        model.run_steps(100); // inside the first workday

        assert!(model.field().total_mass() > 0.0);
        assert_eq!(model.field().total_at(Cell::new(0, 2)), 0.0);
        assert_eq!(model.field().total_at(Cell::new(1, 2)), 0.0);
        assert_eq!(model.exposure().total_inhaled_at(model.isolation_cell()), 0.0);
    }
}

mod interventions {
    use super::*;

    fn daily_test() -> Interventions {
        Interventions {
            test: Some(TestPolicy {
                interval_days: 1,
                accuracy_pct: 100.0,
                isolation_days: 14,
                time_cost_secs: 900,
            }),
            ..Interventions::none()
        }
    }

    #[test]
    fn perfect_test_isolates_every_carrier() {
        let grid = ObstructionGrid::open(3, 3).unwrap();
        let config = ModelConfig { infection_rate: 1.0, ..ModelConfig::default() };
        let mut model = Model::new(&grid, config, daily_test()).unwrap();
        model.add_crew(&station_crew(3, &[(0, 0)])).unwrap();

        model.step(); // first tick runs the day-0 test round
        assert!(model.agents().iter().all(|a| a.is_isolating()));
        assert!(model.agents().iter().all(|a| !a.is_active()));
        assert!(model.agents().iter().all(|a| a.cell() == model.isolation_cell()));
        // Round time cost charged once, plus the ordinary step.
        assert_eq!(model.clock().elapsed_secs(), 900 + 60);
    }

    #[test]
    fn misaligned_test_time_cost_rejected() {
        // A cost that is not a whole number of steps would knock the clock
        // off its seconds-of-day anchor and day boundaries would never fire.
        let grid = ObstructionGrid::open(2, 2).unwrap();
        let config = ModelConfig { time_step_secs: 3_600, ..ModelConfig::default() };
        let mut interventions = daily_test();
        interventions.test.as_mut().unwrap().time_cost_secs = 1_000;
        assert!(Model::new(&grid, config, interventions).is_err());
    }

    #[test]
    fn test_round_leaves_healthy_agents_alone() {
        let grid = ObstructionGrid::open(3, 3).unwrap();
        let mut model = Model::new(&grid, ModelConfig::default(), daily_test()).unwrap();
        model.add_crew(&station_crew(3, &[(0, 0)])).unwrap();
        model.step();
        assert!(model.agents().iter().all(|a| !a.is_isolating()));
    }
}

mod calendar {
    use super::*;

    #[test]
    fn weekends_are_skipped_with_zero_count_entries() {
        let config = ModelConfig { time_step_secs: 3_600, ..ModelConfig::default() };
        let mut model = open_model(3, 3, config);
        model.add_crew(&station_crew(2, &[(0, 0)])).unwrap();
        model.run_steps(60); // past the first weekend

        let start = model.clock().start_date();
        assert!(model.clock().date().days_since(start) >= 8);
        let weekend_days: Vec<_> = model
            .daily_report()
            .days()
            .iter()
            .filter(|(d, _)| d.weekday() >= 5)
            .collect();
        assert!(!weekend_days.is_empty());
        assert!(weekend_days.iter().all(|&(_, &count)| count == 0));
    }

    #[test]
    fn gathering_fires_once_and_resets_daily() {
        let mut model = open_model(3, 3, ModelConfig::default());
        model.add_crew(&station_crew(4, &[(0, 0)])).unwrap();
        model
            .add_gathering(Gathering::new(vec![Cell::new(2, 2)], 0, 10, 2))
            .unwrap();

        assert!(!model.gatherings()[0].happened());
        model.step();
        assert!(model.gatherings()[0].happened());
    }

    #[test]
    fn leaving_agents_are_not_pulled_into_gatherings() {
        // 10-minute shift; the far task leaves the agent 9 cells from home
        // at shift end, so it is still walking back when the gathering
        // fires.  It must finish the walk and deactivate at its station,
        // not get redirected and stranded at the gathering cell.
        let mut model = open_model(1, 10, ModelConfig::default());
        let tasks = vec![
            Task::new(Cell::new(0, 0), 0, 0.0).unwrap(),
            Task::new(Cell::new(0, 9), 100, 1.0).unwrap(),
        ];
        model
            .add_crew(&CrewSpec::new(1, tasks, ShiftWindow::new(0, 600)))
            .unwrap();
        model
            .add_gathering(Gathering::new(vec![Cell::new(0, 9)], 720, 30, 1))
            .unwrap();
        model.run_steps(25);

        assert!(model.gatherings()[0].happened());
        let agent = &model.agents()[0];
        assert!(!agent.is_active());
        assert_eq!(agent.cell(), Cell::new(0, 0));
    }

    #[test]
    fn empty_gathering_location_set_rejected() {
        let mut model = open_model(2, 2, ModelConfig::default());
        assert!(model.add_gathering(Gathering::new(vec![], 0, 10, 2)).is_err());
    }
}

mod determinism {
    use super::*;

    fn scenario(seed: u64) -> Model {
        let config = ModelConfig {
            time_step_secs: 3_600,
            infection_rate: 0.4,
            offsite_infection_rate: 0.02,
            seed,
            ..ModelConfig::default()
        };
        let mut model = open_model(4, 4, config);
        model
            .add_crew(&station_crew(8, &[(0, 0), (3, 3), (0, 3)]))
            .unwrap();
        model
            .add_gathering(Gathering::new(vec![Cell::new(2, 2)], 2 * 3_600, 4, 5))
            .unwrap();
        model
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = scenario(42);
        let mut b = scenario(42);
        a.run_steps(120);
        b.run_steps(120);
        assert_eq!(a.daily_report(), b.daily_report());
        assert_eq!(a.field().total_mass(), b.field().total_mass());
        assert_eq!(a.attack_rate(), b.attack_rate());
        let cells_a: Vec<Cell> = a.agents().iter().map(|ag| ag.cell()).collect();
        let cells_b: Vec<Cell> = b.agents().iter().map(|ag| ag.cell()).collect();
        assert_eq!(cells_a, cells_b);
    }

    #[test]
    fn run_until_stops_at_the_end_timestamp() {
        let config = ModelConfig { time_step_secs: 3_600, ..ModelConfig::default() };
        let mut model = open_model(2, 2, config);
        let end = model.config().start_unix_secs + 2 * 3_600;
        model.run_until(end);
        assert!(model.clock().now_unix_secs >= end);
    }
}
