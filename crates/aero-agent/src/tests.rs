use aero_core::{AgentId, Cell, SimDate, SimRng};
use aero_epi::disease::DiseaseParams;
use aero_field::{AirflowParams, CumulativeMatrices, DecayParams, QuantaField};
use aero_grid::{NavGraph, ObstructionGrid};

use crate::agent::{Agent, StepCtx, TaskState};
use crate::task::{ShiftWindow, Task};

const TODAY: SimDate = SimDate(19_000);

fn world(rows: usize, cols: usize) -> (NavGraph, QuantaField, CumulativeMatrices) {
    let grid = ObstructionGrid::open(rows, cols).unwrap();
    let graph = NavGraph::build(&grid);
    let field = QuantaField::new(&grid, AirflowParams::default(), DecayParams::default(), 60);
    let accum = CumulativeMatrices::new(rows, cols);
    (graph, field, accum)
}

fn worker(tasks: Vec<Task>) -> Agent {
    let shift = ShiftWindow::new(8 * 3_600, 8 * 3_600);
    Agent::new(AgentId(0), tasks, shift, 0.0, false).unwrap()
}

fn task(row: u16, col: u16, duration: u32, probability: f64) -> Task {
    Task::new(Cell::new(row, col), duration, probability).unwrap()
}

fn step_once(
    a: &mut Agent,
    graph: &NavGraph,
    field: &mut QuantaField,
    accum: &mut CumulativeMatrices,
    disease: &DiseaseParams,
    rng: &mut SimRng,
) {
    let mut ctx = StepCtx {
        graph,
        field,
        accum,
        disease,
        mask_efficiency: 0.0,
        mask_compliance: 0.0,
        time_step_secs: 60,
        today: TODAY,
        rng,
    };
    a.step(&mut ctx);
}

mod lifecycle {
    use super::*;

    #[test]
    fn empty_task_list_is_rejected() {
        let shift = ShiftWindow::new(0, 3_600);
        assert!(Agent::new(AgentId(0), vec![], shift, 0.0, false).is_err());
    }

    #[test]
    fn arrive_places_at_primary_station() {
        let mut a = worker(vec![task(1, 1, 5, 1.0)]);
        assert!(!a.is_active());
        a.arrive();
        assert!(a.is_active());
        assert_eq!(a.cell(), Cell::new(1, 1));
        assert_eq!(a.state(), TaskState::Staying);
    }

    #[test]
    fn leave_routes_home_and_deactivates_on_arrival() {
        let (graph, mut field, mut accum) = world(3, 3);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(1);

        let mut a = worker(vec![task(0, 0, 0, 0.0), task(2, 2, 100, 1.0)]);
        a.arrive();
        // Walk out to the far task first.
        for _ in 0..10 {
            step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        }
        assert_eq!(a.cell(), Cell::new(2, 2));

        a.leave(&graph);
        assert!(a.is_leaving());
        for _ in 0..10 {
            if !a.is_active() {
                break;
            }
            step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        }
        assert!(!a.is_active());
        assert_eq!(a.cell(), Cell::new(0, 0));
    }

    #[test]
    fn shift_window_membership() {
        let shift = ShiftWindow::new(9 * 3_600, 8 * 3_600);
        assert!(!shift.contains(9 * 3_600 - 1));
        assert!(shift.contains(9 * 3_600));
        assert!(shift.contains(17 * 3_600 - 1));
        assert!(!shift.contains(17 * 3_600));
    }
}

mod movement {
    use super::*;

    #[test]
    fn stay_expiry_starts_travel_to_weighted_task() {
        let (graph, mut field, mut accum) = world(3, 3);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(2);

        // Primary is a pure fallback; the only drawable task is (2, 2).
        let mut a = worker(vec![task(0, 0, 0, 0.0), task(2, 2, 4, 1.0)]);
        a.arrive();
        step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        assert_eq!(a.state(), TaskState::Traveling);
        for _ in 0..10 {
            step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        }
        assert_eq!(a.cell(), Cell::new(2, 2));
        assert_eq!(a.state(), TaskState::Staying);
    }

    #[test]
    fn zero_probability_tasks_fall_back_to_staying() {
        let (graph, mut field, mut accum) = world(3, 3);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(3);

        let mut a = worker(vec![task(0, 0, 7, 0.0)]);
        a.arrive();
        for _ in 0..50 {
            step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
            assert_eq!(a.state(), TaskState::Staying);
            assert_eq!(a.cell(), Cell::new(0, 0));
        }
    }

    #[test]
    fn unreachable_destination_falls_back_to_staying() {
        // (0, 2) is cut off by a full-height wall.
        let grid = ObstructionGrid::from_rows(vec![vec![0, 3, 0], vec![0, 2, 0]]).unwrap();
        let graph = NavGraph::build(&grid);
        let mut field =
            QuantaField::new(&grid, AirflowParams::default(), DecayParams::default(), 60);
        let mut accum = CumulativeMatrices::new(2, 3);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(4);

        let mut a = worker(vec![task(0, 0, 0, 0.0), task(0, 2, 5, 1.0)]);
        a.arrive();
        for _ in 0..20 {
            step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
            assert_eq!(a.cell(), Cell::new(0, 0));
        }
    }

    #[test]
    fn gathering_duration_takes_priority_once() {
        let (graph, mut field, mut accum) = world(3, 3);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(5);

        let mut a = worker(vec![task(0, 0, 2, 0.0)]);
        a.arrive();
        a.go_to_gathering(&graph, &[Cell::new(2, 2)], 30, &mut rng);
        assert_eq!(a.state(), TaskState::Traveling);
        // Travel to the gathering, then arrive: the stay length must be the
        // gathering's, not the (absent) task's.
        for _ in 0..10 {
            step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
            if a.state() == TaskState::Staying {
                break;
            }
        }
        assert_eq!(a.cell(), Cell::new(2, 2));
        // 30 ticks of staying before the next task draw.
        for _ in 0..30 {
            assert_eq!(a.state(), TaskState::Staying);
            step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        }
    }

    #[test]
    fn fast_agents_clamp_at_path_end() {
        let (graph, mut field, mut accum) = world(1, 4);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(6);

        let mut a = worker(vec![task(0, 0, 0, 0.0), task(0, 3, 5, 1.0)]);
        a.speed = 5.0;
        a.arrive();
        step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng); // draw
        step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng); // one jump
        assert_eq!(a.cell(), Cell::new(0, 3));
    }
}

mod health {
    use super::*;

    #[test]
    fn infected_agent_deposits_quanta() {
        let (graph, mut field, mut accum) = world(2, 2);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(7);

        let mut a = worker(vec![task(0, 0, 100, 0.0)]);
        a.arrive();
        // Infected three days ago: peak shedding bucket.
        a.infect(SimDate(TODAY.0 - 3), &disease, &mut rng);
        step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        assert!(field.total_at(Cell::new(0, 0)) > 0.0);
        assert_eq!(field.total_at(Cell::new(1, 1)), 0.0);
    }

    #[test]
    fn healthy_agent_accumulates_dose() {
        let (graph, mut field, mut accum) = world(2, 2);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(8);

        field.add_quanta(Cell::new(0, 0), [1.0, 1.0, 1.0, 1.0]);
        let mut a = worker(vec![task(0, 0, 100, 0.0)]);
        a.arrive();
        step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        assert!(a.epi().inhaled > 0.0);
        assert!(accum.total_inhaled_at(Cell::new(0, 0)) > 0.0);
    }

    #[test]
    fn shedding_runs_out_and_the_agent_recovers() {
        let (graph, mut field, mut accum) = world(2, 2);
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(9);

        let mut a = worker(vec![task(0, 0, 100, 0.0)]);
        a.arrive();
        a.infect(SimDate(TODAY.0 - 20), &disease, &mut rng);
        step_once(&mut a, &graph, &mut field, &mut accum, &disease, &mut rng);
        assert!(a.epi().healthy);
        assert!(!a.epi().symptomatic);
        assert_eq!(field.total_at(Cell::new(0, 0)), 0.0);
    }

    #[test]
    fn massive_dose_infects_and_resets() {
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(10);
        let mut a = worker(vec![task(0, 0, 1, 1.0)]);
        a.epi_mut().inhaled = 1e9;
        let infected = a.roll_daily_infection(0.0, TODAY, &disease, &mut rng);
        assert!(infected);
        assert!(!a.epi().healthy);
        assert_eq!(a.epi().infection_date, Some(TODAY));
        assert_eq!(a.epi().inhaled, 0.0);
    }

    #[test]
    fn full_immunity_blocks_every_roll() {
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(11);
        let shift = ShiftWindow::new(0, 3_600);
        let mut a = Agent::new(AgentId(1), vec![task(0, 0, 1, 1.0)], shift, 1.0, true).unwrap();
        a.epi_mut().inhaled = 1e9;
        assert!(!a.roll_daily_infection(1.0, TODAY, &disease, &mut rng));
        assert!(a.epi().healthy);
    }

    #[test]
    fn symptoms_appear_after_onset_date() {
        let disease = DiseaseParams::covid().unwrap();
        let mut rng = SimRng::new(12);
        let mut a = worker(vec![task(0, 0, 1, 1.0)]);
        a.infect(TODAY, &disease, &mut rng);
        a.check_symptom_start(TODAY.next());
        assert!(!a.epi().symptomatic);
        // Onset is sampled in 2..8 days; day 9 is safely past it.
        a.check_symptom_start(SimDate(TODAY.0 + 9));
        assert!(a.epi().symptomatic);
    }

    #[test]
    fn isolation_holds_until_duration_elapses() {
        let mut a = worker(vec![task(0, 0, 1, 1.0)]);
        a.arrive();
        a.isolate(5, Cell::new(9, 9), TODAY);
        assert!(a.is_isolating());
        assert!(!a.is_active());
        assert_eq!(a.cell(), Cell::new(9, 9));

        a.check_finish_isolation(SimDate(TODAY.0 + 4));
        assert!(!a.epi().isolation_finished);
        a.check_finish_isolation(SimDate(TODAY.0 + 5));
        assert!(a.epi().isolation_finished);
        assert_eq!(a.state(), TaskState::Traveling);
    }

    #[test]
    fn test_freeze_restores_prior_state() {
        let mut a = worker(vec![task(0, 0, 3, 1.0)]);
        a.arrive();
        let prior = a.freeze_for_test();
        assert_eq!(a.state(), TaskState::Testing);
        a.resume_after_test(prior);
        assert_eq!(a.state(), TaskState::Staying);
    }
}
