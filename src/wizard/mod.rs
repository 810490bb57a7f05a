//! Wizard state machine
//!
//! The interactive flow is a linear sequence of steps with a confirm
//! sub-state on the scanning path. State lives in an explicit value and
//! every transition is the pure function [`transition`]; the driver owns the
//! prompts and side effects.

/// Wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Greeting and entry point
    Welcome,
    /// Name, age, height, weight
    PersonalInfo,
    /// Health conditions, allergies, dietary restrictions
    HealthInfo,
    /// Barcode/label acquisition
    Scanning,
    /// Product summary shown for user confirmation
    ConfirmProduct,
    /// Analysis text displayed
    Results,
}

/// Events produced by the wizard driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    /// The current step completed successfully
    Continue,
    /// The user asked to go back one step
    Back,
    /// A product record was acquired during scanning
    ProductFound,
    /// The user rejected the product summary
    RejectProduct,
    /// The analysis finished and results are ready
    AnalysisComplete,
    /// Analyze another product with the same profile
    AnalyzeAnother,
    /// Discard everything and restart from the greeting
    StartOver,
}

/// Compute the next state for an event. Combinations with no defined edge
/// leave the state unchanged, which is how step-local failures (invalid
/// input, failed lookup, failed analysis) keep the user on the current step.
pub fn transition(state: WizardState, event: WizardEvent) -> WizardState {
    use WizardEvent::*;
    use WizardState::*;

    match (state, event) {
        (Welcome, Continue) => PersonalInfo,
        (PersonalInfo, Continue) => HealthInfo,
        (HealthInfo, Continue) => Scanning,
        (HealthInfo, Back) => PersonalInfo,
        (Scanning, ProductFound) => ConfirmProduct,
        (Scanning, Back) => HealthInfo,
        (ConfirmProduct, AnalysisComplete) => Results,
        (ConfirmProduct, RejectProduct) => Scanning,
        (Results, AnalyzeAnother) => Scanning,
        (_, StartOver) => Welcome,
        (unchanged, _) => unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::WizardEvent::*;
    use super::WizardState::*;
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = Welcome;
        for event in [Continue, Continue, Continue, ProductFound, AnalysisComplete] {
            state = transition(state, event);
        }
        assert_eq!(state, Results);
    }

    #[test]
    fn test_back_from_health_info() {
        assert_eq!(transition(HealthInfo, Back), PersonalInfo);
    }

    #[test]
    fn test_back_from_scanning() {
        assert_eq!(transition(Scanning, Back), HealthInfo);
    }

    #[test]
    fn test_reject_product_rescans() {
        assert_eq!(transition(ConfirmProduct, RejectProduct), Scanning);
    }

    #[test]
    fn test_analyze_another_keeps_profile_steps_behind() {
        assert_eq!(transition(Results, AnalyzeAnother), Scanning);
    }

    #[test]
    fn test_start_over_from_anywhere() {
        for state in [Welcome, PersonalInfo, HealthInfo, Scanning, ConfirmProduct, Results] {
            assert_eq!(transition(state, StartOver), Welcome);
        }
    }

    #[test]
    fn test_undefined_edges_hold_state() {
        assert_eq!(transition(Welcome, Back), Welcome);
        assert_eq!(transition(Scanning, Continue), Scanning);
        assert_eq!(transition(Results, ProductFound), Results);
    }
}
