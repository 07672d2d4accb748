use crate::client::Client;
use crate::types::{
    FinalizeMealPlansResponse, MealPlan, MealPlanCreationRequestInput, MealPlanEvent,
    MealPlanEventCreationRequestInput, MealPlanEventUpdateRequestInput, MealPlanOption,
    MealPlanOptionCreationRequestInput, MealPlanOptionUpdateRequestInput, MealPlanOptionVote,
    MealPlanOptionVoteCreationRequestInput, MealPlanOptionVoteUpdateRequestInput,
    MealPlanUpdateRequestInput,
};

impl Client {
    bindings! {
        one CreateMealPlan => create_meal_plan(; MealPlanCreationRequestInput) -> MealPlan
            = POST ["/api/v1/meal_plans"];
        one GetMealPlan => get_meal_plan(meal_plan_id) -> MealPlan
            = GET ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"}];
        /// Meal plans of the active household
        page GetMealPlans => get_meal_plans() -> MealPlan
            = GET ["/api/v1/meal_plans"];
        one UpdateMealPlan => update_meal_plan(meal_plan_id; MealPlanUpdateRequestInput) -> MealPlan
            = PUT ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"}];
        unit ArchiveMealPlan => archive_meal_plan(meal_plan_id)
            = DELETE ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"}];
        /// Close voting and pick the winning option of every event
        one FinalizeMealPlan => finalize_meal_plan(meal_plan_id) -> FinalizeMealPlansResponse
            = POST ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "finalize"];

        one CreateMealPlanEvent => create_meal_plan_event(meal_plan_id; MealPlanEventCreationRequestInput) -> MealPlanEvent
            = POST ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events"];
        one GetMealPlanEvent => get_meal_plan_event(meal_plan_id, meal_plan_event_id) -> MealPlanEvent
            = GET ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"}];
        page GetMealPlanEvents => get_meal_plan_events(meal_plan_id) -> MealPlanEvent
            = GET ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events"];
        one UpdateMealPlanEvent => update_meal_plan_event(meal_plan_id, meal_plan_event_id; MealPlanEventUpdateRequestInput) -> MealPlanEvent
            = PUT ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"}];
        unit ArchiveMealPlanEvent => archive_meal_plan_event(meal_plan_id, meal_plan_event_id)
            = DELETE ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"}];

        one CreateMealPlanOption => create_meal_plan_option(meal_plan_id, meal_plan_event_id; MealPlanOptionCreationRequestInput) -> MealPlanOption
            = POST ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options"];
        one GetMealPlanOption => get_meal_plan_option(meal_plan_id, meal_plan_event_id, meal_plan_option_id) -> MealPlanOption
            = GET ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options" {meal_plan_option_id: "mealPlanOption"}];
        page GetMealPlanOptions => get_meal_plan_options(meal_plan_id, meal_plan_event_id) -> MealPlanOption
            = GET ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options"];
        one UpdateMealPlanOption => update_meal_plan_option(meal_plan_id, meal_plan_event_id, meal_plan_option_id; MealPlanOptionUpdateRequestInput) -> MealPlanOption
            = PUT ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options" {meal_plan_option_id: "mealPlanOption"}];
        unit ArchiveMealPlanOption => archive_meal_plan_option(meal_plan_id, meal_plan_event_id, meal_plan_option_id)
            = DELETE ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options" {meal_plan_option_id: "mealPlanOption"}];

        /// Cast the caller's ranked votes for an event; returns one vote per option
        one CreateMealPlanOptionVote => create_meal_plan_option_vote(meal_plan_id, meal_plan_event_id; MealPlanOptionVoteCreationRequestInput) -> Vec<MealPlanOptionVote>
            = POST ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "vote"];
        one GetMealPlanOptionVote => get_meal_plan_option_vote(meal_plan_id, meal_plan_event_id, meal_plan_option_id, meal_plan_option_vote_id) -> MealPlanOptionVote
            = GET ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options" {meal_plan_option_id: "mealPlanOption"} "votes" {meal_plan_option_vote_id: "mealPlanOptionVote"}];
        page GetMealPlanOptionVotes => get_meal_plan_option_votes(meal_plan_id, meal_plan_event_id, meal_plan_option_id) -> MealPlanOptionVote
            = GET ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options" {meal_plan_option_id: "mealPlanOption"} "votes"];
        one UpdateMealPlanOptionVote => update_meal_plan_option_vote(meal_plan_id, meal_plan_event_id, meal_plan_option_id, meal_plan_option_vote_id; MealPlanOptionVoteUpdateRequestInput) -> MealPlanOptionVote
            = PUT ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options" {meal_plan_option_id: "mealPlanOption"} "votes" {meal_plan_option_vote_id: "mealPlanOptionVote"}];
        unit ArchiveMealPlanOptionVote => archive_meal_plan_option_vote(meal_plan_id, meal_plan_event_id, meal_plan_option_id, meal_plan_option_vote_id)
            = DELETE ["/api/v1/meal_plans" {meal_plan_id: "mealPlan"} "events" {meal_plan_event_id: "mealPlanEvent"} "options" {meal_plan_option_id: "mealPlanOption"} "votes" {meal_plan_option_vote_id: "mealPlanOptionVote"}];
    }
}
