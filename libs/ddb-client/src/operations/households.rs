use crate::client::Client;
use crate::types::auth::{HouseholdInvitationUpdateRequestInput, HouseholdOwnershipTransferInput};
use crate::types::{
    Household, HouseholdCreationRequestInput, HouseholdInvitation,
    HouseholdInvitationCreationRequestInput, HouseholdUpdateRequestInput,
    ModifyUserPermissionsInput, UserPermissionsResponse,
};

impl Client {
    bindings! {
        one CreateHousehold => create_household(; HouseholdCreationRequestInput) -> Household
            = POST ["/api/v1/households"];
        one GetHousehold => get_household(household_id) -> Household
            = GET ["/api/v1/households" {household_id: "household"}];
        /// The household requests act on by default
        one GetActiveHousehold => get_active_household() -> Household
            = GET ["/api/v1/households/current"];
        page GetHouseholds => get_households() -> Household
            = GET ["/api/v1/households"];
        one UpdateHousehold => update_household(household_id; HouseholdUpdateRequestInput) -> Household
            = PUT ["/api/v1/households" {household_id: "household"}];
        unit ArchiveHousehold => archive_household(household_id)
            = DELETE ["/api/v1/households" {household_id: "household"}];
        one SetDefaultHousehold => set_default_household(household_id) -> Household
            = POST ["/api/v1/households" {household_id: "household"} "default"];
        one TransferHouseholdOwnership => transfer_household_ownership(household_id; HouseholdOwnershipTransferInput) -> Household
            = POST ["/api/v1/households" {household_id: "household"} "transfer"];
        unit RemoveUserFromHousehold => remove_user_from_household(household_id, user_id)
            = DELETE ["/api/v1/households" {household_id: "household"} "members" {user_id: "user"}];
        /// Replace a member's household roles
        one UpdateHouseholdMemberPermissions => update_household_member_permissions(household_id, user_id; ModifyUserPermissionsInput) -> UserPermissionsResponse
            = PATCH ["/api/v1/households" {household_id: "household"} "members" {user_id: "user"} "permissions"];

        /// Invite someone by email address to join the household
        one InviteUserToHousehold => invite_user_to_household(household_id; HouseholdInvitationCreationRequestInput) -> HouseholdInvitation
            = POST ["/api/v1/households" {household_id: "household"} "invite"];
        one GetHouseholdInvitationByID => get_household_invitation_by_id(household_id, household_invitation_id) -> HouseholdInvitation
            = GET ["/api/v1/households" {household_id: "household"} "invitations" {household_invitation_id: "householdInvitation"}];
        one GetHouseholdInvitation => get_household_invitation(household_invitation_id) -> HouseholdInvitation
            = GET ["/api/v1/household_invitations" {household_invitation_id: "householdInvitation"}];
        /// Invitations the caller sent that are still pending
        page GetPendingHouseholdInvitationsFromUser => get_pending_household_invitations_from_user() -> HouseholdInvitation
            = GET ["/api/v1/household_invitations/sent"];
        /// Invitations addressed to the caller that are still pending
        page GetPendingHouseholdInvitationsForUser => get_pending_household_invitations_for_user() -> HouseholdInvitation
            = GET ["/api/v1/household_invitations/received"];
        one AcceptHouseholdInvitation => accept_household_invitation(household_invitation_id; HouseholdInvitationUpdateRequestInput) -> HouseholdInvitation
            = PUT ["/api/v1/household_invitations" {household_invitation_id: "householdInvitation"} "accept"];
        one CancelHouseholdInvitation => cancel_household_invitation(household_invitation_id; HouseholdInvitationUpdateRequestInput) -> HouseholdInvitation
            = PUT ["/api/v1/household_invitations" {household_invitation_id: "householdInvitation"} "cancel"];
        one RejectHouseholdInvitation => reject_household_invitation(household_invitation_id; HouseholdInvitationUpdateRequestInput) -> HouseholdInvitation
            = PUT ["/api/v1/household_invitations" {household_invitation_id: "householdInvitation"} "reject"];
    }
}
