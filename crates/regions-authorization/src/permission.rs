//! Permissions granted to roles inside an area

use regions_core::indexed_enum;

indexed_enum! {
    /// Action a role may be allowed to perform inside an area.
    pub enum Permission {
        /// Full control over the area, including its roles
        Administration => "administration",
        /// Editing role permissions and membership
        Management => "management",
        /// Entering the area
        Entrance => "entrance",
        /// Leaving the area
        Exit => "exit",
        /// Breaking blocks
        BlockBreak => "blockBreak",
        /// Placing blocks
        BlockPlace => "blockPlace",
        /// Using doors, buttons, containers and other blocks
        BlockInteraction => "blockInteraction",
        /// Interacting with entities
        EntityInteraction => "entityInteraction",
        /// Attacking entities
        Attack => "attack",
        /// Dropping items
        ItemDrop => "itemDrop",
        /// Picking up items
        ItemPickup => "itemPickup",
        /// Filling buckets
        BucketFill => "bucketFill",
        /// Emptying buckets
        BucketEmpty => "bucketEmpty",
        /// Sending chat messages
        Chat => "chat",
        /// Running commands while inside the area
        Command => "command",
    }
}
