//! Model-level checks on the two shipped scenarios: parsing, mock
//! coverage, screen ordering, and generated-script structure. No test
//! here launches a browser.

use ballotproof_harness::mock::MockRegistry;
use ballotproof_harness::playwright::{PlaywrightConfig, PlaywrightHandle};
use ballotproof_harness::scenario::{Scenario, ScenarioStep};

const ADMIN_DASHBOARD: &str = include_str!("../../../scenarios/admin_dashboard.yaml");
const VOTE_FLOW: &str = include_str!("../../../scenarios/vote_flow.yaml");

fn admin() -> Scenario {
    Scenario::from_yaml(ADMIN_DASHBOARD).expect("admin scenario must parse")
}

fn vote() -> Scenario {
    Scenario::from_yaml(VOTE_FLOW).expect("vote scenario must parse")
}

/// Index of the first step whose label contains `needle`
fn step_index(scenario: &Scenario, needle: &str) -> usize {
    scenario
        .steps
        .iter()
        .position(|s| s.label().contains(needle))
        .unwrap_or_else(|| panic!("no step matching '{needle}'"))
}

fn has_assert(scenario: &Scenario, selector: &str) -> bool {
    scenario.steps.iter().any(|s| {
        matches!(s, ScenarioStep::Assert { selector: sel, .. } if sel == selector)
    })
}

#[test]
fn admin_scenario_shape() {
    let scenario = admin();

    assert_eq!(scenario.viewport.width, 1920);
    assert_eq!(scenario.viewport.height, 1080);

    let auth = scenario.auth.as_ref().expect("admin auth missing");
    assert_eq!(auth.role, "ADMIN");
    assert_eq!(auth.user_id, "admin1");
    assert_eq!(auth.cookie_name, "token");

    assert_eq!(scenario.failure_screenshot_name(), "admin_dashboard_final_fail");
}

#[test]
fn admin_scenario_asserts_mocked_stat_values() {
    let scenario = admin();

    for selector in [
        "text=Registered Voters",
        "text=1250",
        "text=Active Elections",
        "text=3",
        "text=Pending KYC Reviews",
        "text=5",
        "text=Blockchain Height",
        "text=10500",
        "text=Student Council Election 2024",
        "text=Faculty Representative Vote",
        "text=ACTIVE",
        "text=New Voter Registration",
        "text=Election Created",
    ] {
        assert!(has_assert(&scenario, selector), "missing assert for {selector}");
    }

    // Waits for the shell before asserting anything
    let wait = step_index(&scenario, "wait:text=Admin Portal");
    let first_assert = step_index(&scenario, "assert:");
    assert!(wait < first_assert);
}

#[test]
fn admin_mocks_cover_dashboard_requests() {
    let scenario = admin();
    let registry = MockRegistry::new(&scenario.mocks).unwrap();

    for url in [
        "http://localhost:3000/api/auth/me",
        "http://localhost:3000/api/admin/stats",
        "http://localhost:3000/api/elections",
    ] {
        assert!(registry.find(url).is_some(), "no mock for {url}");
    }

    let stats = registry.find("http://localhost:3000/api/admin/stats").unwrap();
    assert_eq!(stats.body["totalVoters"], 1250);
    assert_eq!(stats.body["activeElectionsCount"], 3);
    assert_eq!(stats.body["pendingKycCount"], 5);
    assert_eq!(stats.body["blockchain"]["height"], 10500);

    let elections = registry.find("http://localhost:3000/api/elections").unwrap();
    assert_eq!(elections.body[0]["title"], "Student Council Election 2024");
    assert_eq!(elections.body[0]["status"], "ACTIVE");
    assert_eq!(elections.body[1]["title"], "Faculty Representative Vote");
}

#[test]
fn vote_mocks_cover_ballot_requests() {
    let scenario = vote();
    let registry = MockRegistry::new(&scenario.mocks).unwrap();

    for url in [
        "http://localhost:3000/api/auth/me",
        "http://localhost:3000/api/elections/123",
        "http://localhost:3000/api/vote/request-otp",
        "http://localhost:3000/api/vote/verify-otp",
    ] {
        assert!(registry.find(url).is_some(), "no mock for {url}");
    }

    let election = registry.find("http://localhost:3000/api/elections/123").unwrap();
    assert_eq!(election.body["election"]["candidates"][0]["name"], "Jane Doe");

    let receipt = registry.find("http://localhost:3000/api/vote/verify-otp").unwrap();
    assert_eq!(
        receipt.body["receipt"]["voteVerificationCode"],
        "VOTE-RECEIPT-123"
    );
    assert_eq!(receipt.body["receipt"]["transactionHash"], "0xabc123def456");
}

#[test]
fn vote_flow_screens_are_strictly_ordered() {
    let scenario = vote();

    // Each screen's marker wait comes after the action that triggers it.
    let order = [
        step_index(&scenario, "wait:text=Test Election 2024"),
        step_index(&scenario, "click:text=Select Candidate"),
        step_index(&scenario, "wait:text=Verify Identity"),
        step_index(&scenario, "click:text=Account Password"),
        step_index(&scenario, "fill:input[type=password]"),
        step_index(&scenario, "click:text=Verify Password"),
        step_index(&scenario, "wait:text=Confirm Your Vote"),
        step_index(&scenario, "click:text=Proceed to Final Step"),
        step_index(&scenario, "wait:text=Email Verification Required"),
        step_index(&scenario, "click:text=Confirm & Cast Vote"),
        step_index(&scenario, "wait:text=Vote Successfully Recorded"),
    ];

    for pair in order.windows(2) {
        assert!(pair[0] < pair[1], "screens out of order at {pair:?}");
    }
}

#[test]
fn receipt_only_after_otp_submission() {
    let scenario = vote();

    // Six OTP digits, all filled before the cast click
    let otp_fills: Vec<usize> = scenario
        .steps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.label().starts_with("fill:input[type=text]"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(otp_fills.len(), 6);

    let cast = step_index(&scenario, "click:text=Confirm & Cast Vote");
    let receipt = step_index(&scenario, "wait:text=Vote Successfully Recorded");

    assert!(otp_fills.iter().all(|&i| i < cast));
    assert!(cast < receipt);

    // Receipt assertions trail the receipt wait
    assert!(receipt < step_index(&scenario, "assert:text=VOTE-RECEIPT-123"));
    assert!(receipt < step_index(&scenario, "assert:text=0xabc123def456"));
}

fn build_script(scenario: &Scenario) -> String {
    let dir = tempfile::tempdir().unwrap();
    let handle = PlaywrightHandle::new(PlaywrightConfig {
        artifacts_dir: dir.path().to_path_buf(),
        ..Default::default()
    })
    .unwrap();
    handle.build_script(scenario).unwrap()
}

#[test]
fn admin_script_mocks_before_steps_and_cookie_before_navigation() {
    let script = build_script(&admin());

    let cookie = script.find("addCookies").expect("no cookie");
    let guard = script.find("'**/api/**'").expect("no guard route");
    let stats_mock = script.find("**/api/admin/stats").expect("no stats mock");
    let goto = script.find("page.goto").expect("no navigation");

    assert!(cookie < goto);
    assert!(guard < stats_mock);
    assert!(stats_mock < goto);

    assert!(script.contains(r#"page.goto("http://localhost:3000/admin/dashboard")"#));
    assert!(script.contains("admin_dashboard_final_fail.png"));
}

#[test]
fn vote_script_orders_receipt_after_cast() {
    let script = build_script(&vote());

    let cast = script.find(r#"page.click("text=Confirm & Cast Vote""#).expect("no cast click");
    let receipt = script
        .find(r#"page.waitForSelector("text=Vote Successfully Recorded""#)
        .expect("no receipt wait");
    assert!(cast < receipt);

    // Apostrophe selector survives JSON escaping
    assert!(script.contains(r#"We've sent a 6-digit code"#));
    assert!(script.contains("vote_flow_fail.png"));
}

#[test]
fn script_generation_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let handle = PlaywrightHandle::new(PlaywrightConfig {
        artifacts_dir: dir.path().to_path_buf(),
        ..Default::default()
    })
    .unwrap();

    let scenario = vote();
    assert_eq!(
        handle.build_script(&scenario).unwrap(),
        handle.build_script(&scenario).unwrap()
    );
}
